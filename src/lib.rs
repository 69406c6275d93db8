//! # precis
//!
//! Summarize a PDF, or ask it a question, with a text-generation model.
//!
//! ## The Problem
//!
//! Generation models read a bounded window of input. A PDF of any real
//! length does not fit. The document has to be cut into pieces the model can
//! take one at a time, each piece answered on its own, and the answers
//! stitched back together in the order the text came in.
//!
//! ## The Pipeline
//!
//! ```text
//! PDF ──extract──▶ document text ──normalize──▶ "w1 w2 ... w1200"
//!                                                     │
//!                                                chunk (500 words)
//!                                                     ▼
//!                            ["w1..w500", "w501..w1000", "w1001..w1200"]
//!                                                     │
//!                               prompt + "\n" + chunk │ one call per chunk
//!                                                     ▼
//!                               [fragment 0, fragment 1, fragment 2]
//!                                                     │
//!                                               join with "\n"
//!                                                     ▼
//!                                              final response
//! ```
//!
//! | Stage | Function / type | Fails with |
//! |-------|-----------------|------------|
//! | Extract | [`extract_text`], [`PdfDocument`] | [`Error::ExtractionEmpty`] |
//! | Normalize | [`normalize`] | never |
//! | Chunk | [`WordChunker`] | never |
//! | Generate | [`ResponseGenerator`] | [`Error::Generation`] |
//! | Aggregate | [`aggregate`] | never |
//!
//! The model is whatever implements [`Generator`]: an [`OllamaGenerator`]
//! in production, a closure in tests. A [`ModelRegistry`] builds one per
//! [`Mode`] on first use and hands the same instance out after that.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use precis::{respond_to_text, GenerationError, Generator, ResponseGenerator};
//!
//! let model: Arc<dyn Generator> = Arc::new(|input: &str| -> Result<String, GenerationError> {
//!     Ok(format!("<<{input}>>"))
//! });
//!
//! let report = respond_to_text(
//!     "Some   extracted\n\ntext",
//!     "Summarize:",
//!     &ResponseGenerator::default(),
//!     &model,
//! )
//! .unwrap();
//!
//! assert_eq!(report.words, 3);
//! assert_eq!(report.chunks, 1);
//! assert_eq!(report.response, "<<Summarize:\nSome extracted text>>");
//! ```

mod capacity;
pub mod cli;
mod config;
mod error;
mod extract;
mod model;
mod normalize;
mod ollama;
mod pipeline;
mod registry;
mod respond;
mod slab;
mod word;

pub use capacity::ChunkCapacity;
pub use config::{ChunkingConfig, Config, GenerationConfig, ModelsConfig, OutputConfig};
pub use error::{Error, MissingInput, Result};
pub use extract::{extract_text, PageSource, PdfDocument};
pub use model::{GenerationError, Generator};
pub use normalize::{normalize, word_count};
pub use ollama::OllamaGenerator;
pub use pipeline::{
    resolve_prompt, respond_to_pages, respond_to_text, Prepared, Report, Request, Summarizer, EXPORT_FILE_NAME,
};
pub use registry::{Mode, ModelRegistry};
pub use respond::{aggregate, FailurePolicy, GenerationPolicy, ResponseGenerator};
pub use slab::Slab;
pub use word::WordChunker;

/// A text chunking strategy.
///
/// ```rust
/// use precis::{ChunkCapacity, Chunker, WordChunker};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<precis::Slab> {
///     chunker.chunk(text)
/// }
///
/// let words = WordChunker::new(ChunkCapacity::new(3).unwrap());
/// let slabs = chunk_document(&words, "Hello world. This is a test.");
/// assert_eq!(slabs.len(), 2);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each chunk is a [`Slab`] containing the text and its byte offsets
    /// in the original document.
    fn chunk(&self, text: &str) -> Vec<Slab>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize;
}
