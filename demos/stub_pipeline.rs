//! The Pipeline Without a Model
//!
//! Runs normalize → chunk → generate → aggregate with a stub in place of
//! the model, to show what each chunk's request looks like.
//!
//! ```bash
//! cargo run --example stub_pipeline
//! ```

use std::sync::Arc;

use precis::{respond_to_pages, ChunkCapacity, GenerationError, GenerationPolicy, Generator, ResponseGenerator, WordChunker};

fn main() {
    // Three "pages" as a PDF reader might return them; the middle one is a scan
    let pages = vec![
        Some("Machine learning models learn patterns from data.\nThey generalize\n\nthese patterns.".to_string()),
        None,
        Some("Deep learning extends this with   multiple hidden layers.".to_string()),
    ];

    // Report what the model was asked instead of generating anything
    let model: Arc<dyn Generator> = Arc::new(|input: &str| -> Result<String, GenerationError> {
        let (prompt, chunk) = input.split_once('\n').unwrap_or((input, ""));
        Ok(format!("[{prompt}] {} words: {chunk}", chunk.split(' ').count()))
    });

    let responder = ResponseGenerator::new(
        WordChunker::new(ChunkCapacity::new(8).unwrap()),
        GenerationPolicy::default(),
    );

    match respond_to_pages(&pages, "Summarize:", &responder, &model) {
        Ok(report) => {
            println!("Extracted {} words in {} chunks\n", report.words, report.chunks);
            println!("{}", report.response);
        }
        Err(e) => eprintln!("error: {e}"),
    }
}
