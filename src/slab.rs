//! The Slab type: one chunk of document text with position metadata.

/// A chunk of text with its position in the source text.
///
/// Each slab is the unit of work for the generation step: the prompt is
/// prepended to `text` and the result is sent to the model on its own.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the chunked text, spanning from
/// the first byte of the slab's first word to the last byte of its last
/// word. For normalized input (single spaces between words) the span slices
/// out exactly `text`:
///
/// ```rust
/// use precis::Slab;
///
/// let source = "alpha beta gamma";
/// let slab = Slab::new("beta gamma", 6, 16, 1, 2);
///
/// assert_eq!(&source[slab.span()], slab.text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    /// The chunk's words, joined by single spaces.
    pub text: String,
    /// Byte offset of the first word in the source text.
    pub start: usize,
    /// Byte offset just past the last word (exclusive).
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// Number of words in this chunk.
    pub words: usize,
}

impl Slab {
    /// Create a new slab.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize, words: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
            words,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the source text.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}
