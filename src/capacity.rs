//! Chunk capacity, measured in words.
//!
//! ## Why Words?
//!
//! Generation models have an input window measured in tokens, and tokens
//! track words far better than bytes do. A byte budget cuts a 40-page PDF of
//! short English words and a 40-page PDF of long German compounds into very
//! different amounts of model input. A word budget keeps each request to the
//! model roughly the same size.
//!
//! ```text
//! capacity = 500 words
//!
//! 1200 words → [500] [500] [200]
//!  501 words → [500] [1]
//!  499 words → [499]
//! ```
//!
//! The default of 500 words sits comfortably under a 512-token encoder
//! window once the prompt is prepended, at about 0.75 words per token for
//! English prose.

use crate::{Error, Result};

/// Maximum number of words per chunk.
///
/// # Examples
///
/// ```rust
/// use precis::ChunkCapacity;
///
/// let cap = ChunkCapacity::new(500).unwrap();
/// assert_eq!(cap.words(), 500);
///
/// assert!(ChunkCapacity::new(0).is_err());
/// assert_eq!(ChunkCapacity::default().words(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCapacity {
    words: usize,
}

impl ChunkCapacity {
    /// Words per chunk when nothing else is configured.
    pub const DEFAULT_WORDS: usize = 500;

    /// Create a capacity of `words` words per chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `words == 0`.
    pub fn new(words: usize) -> Result<Self> {
        if words == 0 {
            Err(Error::InvalidChunkSize(words))
        } else {
            Ok(Self { words })
        }
    }

    /// The maximum words per chunk.
    #[must_use]
    pub const fn words(&self) -> usize {
        self.words
    }

    /// Whether a chunk holding `current` words has room for `additional` more.
    #[must_use]
    pub const fn has_room(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) <= self.words
    }

    /// Number of chunks a text of `word_count` words splits into.
    #[must_use]
    pub const fn chunks_for(&self, word_count: usize) -> usize {
        word_count.div_ceil(self.words)
    }
}

impl Default for ChunkCapacity {
    fn default() -> Self {
        Self {
            words: Self::DEFAULT_WORDS,
        }
    }
}

impl TryFrom<usize> for ChunkCapacity {
    type Error = Error;

    fn try_from(words: usize) -> Result<Self> {
        Self::new(words)
    }
}
