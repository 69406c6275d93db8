//! Word-count chunking.
//!
//! Split text into words on whitespace, then cut the word sequence into
//! consecutive groups of at most N words.
//!
//! ## How It Works
//!
//! ```text
//! capacity = 3
//!
//! Text:    "one two  three\nfour five six seven"
//! Words:   [one, two, three, four, five, six, seven]
//!
//! Chunk 0: "one two three"    words 0..3
//! Chunk 1: "four five six"    words 3..6
//! Chunk 2: "seven"            words 6..7  <- final chunk may be shorter
//! ```
//!
//! There is no overlap: every word lands in exactly one chunk, in order.
//! Joining the chunks' words back together gives the source's word
//! sequence. Each chunk is answered by the model independently and the
//! answers are stitched back in order, so any overlap would show up twice
//! in the final response.
//!
//! Boundaries fall wherever the count runs out, mid-sentence included.
//! Semantic boundary detection would change which words the model sees
//! together, and so would change the output.

use crate::normalize::is_separator;
use crate::{ChunkCapacity, Chunker, Slab};

/// Chunker that packs up to N whitespace-separated words per chunk.
///
/// ## Example
///
/// ```rust
/// use precis::{Chunker, ChunkCapacity, WordChunker};
///
/// let chunker = WordChunker::new(ChunkCapacity::new(2).unwrap());
/// let slabs = chunker.chunk("one two three");
///
/// assert_eq!(slabs.len(), 2);
/// assert_eq!(slabs[0].text, "one two");
/// assert_eq!(slabs[1].text, "three");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordChunker {
    capacity: ChunkCapacity,
}

impl WordChunker {
    /// Create a chunker with the given capacity.
    #[must_use]
    pub const fn new(capacity: ChunkCapacity) -> Self {
        Self { capacity }
    }

    /// The configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> ChunkCapacity {
        self.capacity
    }
}

/// Iterate `(byte_offset, word)` for each whitespace-separated word.
fn words_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = text.char_indices().peekable();
    std::iter::from_fn(move || {
        // Skip to the next word start
        while rest.next_if(|&(_, c)| is_separator(c)).is_some() {}
        let (start, _) = *rest.peek()?;
        let mut end = text.len();
        while let Some(&(i, c)) = rest.peek() {
            if is_separator(c) {
                end = i;
                break;
            }
            rest.next();
        }
        Some((start, &text[start..end]))
    })
}

impl Chunker for WordChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        let limit = self.capacity.words();
        let mut slabs = Vec::with_capacity(self.estimate_chunks(text.len()));

        let mut buf = String::new();
        let mut count = 0;
        let mut start = 0;
        let mut end = 0;

        for (offset, word) in words_with_offsets(text) {
            if !self.capacity.has_room(count, 1) {
                let index = slabs.len();
                slabs.push(Slab::new(std::mem::take(&mut buf), start, end, index, count));
                count = 0;
            }
            if count == 0 {
                start = offset;
            } else {
                buf.push(' ');
            }
            buf.push_str(word);
            end = offset + word.len();
            count += 1;
        }

        if count > 0 {
            let index = slabs.len();
            slabs.push(Slab::new(buf, start, end, index, count));
        }

        debug_assert!(slabs.iter().all(|s| !s.is_empty() && s.words <= limit));
        slabs
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        if text_len == 0 {
            return 0;
        }
        // ~6 bytes per English word including the separator
        self.capacity.chunks_for(text_len / 6).max(1)
    }
}
