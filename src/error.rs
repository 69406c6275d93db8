//! Error types for precis.

use crate::model::GenerationError;
use crate::registry::Mode;

/// The request input that was absent or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    /// No document bytes were supplied.
    Document,
    /// No prompt was supplied, or it was blank.
    Prompt,
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => f.write_str("document"),
            Self::Prompt => f.write_str("prompt"),
        }
    }
}

/// Errors that can occur while turning a document into a response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// A request arrived without a document or without a prompt.
    #[error("missing input: a {0} is required")]
    InputMissing(MissingInput),

    /// The bytes could not be opened as a PDF.
    #[error("invalid pdf: {0}")]
    Pdf(String),

    /// The whole document yielded no extractable text.
    #[error("no extractable text found; the PDF may be scanned, try an OCR-based tool")]
    ExtractionEmpty,

    /// The generation capability for a mode could not be constructed.
    #[error("failed to load model for mode '{mode}': {reason}")]
    ModelLoad {
        /// The mode whose model failed to load.
        mode: Mode,
        /// What went wrong.
        reason: String,
    },

    /// Generation failed for a chunk after all retries.
    #[error("generation failed for chunk {chunk}: {source}")]
    Generation {
        /// Zero-based index of the failing chunk.
        chunk: usize,
        /// The underlying fault.
        #[source]
        source: GenerationError,
    },

    /// Configuration could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a condition the user can act on (bad or unusable
    /// input) rather than a fault in the system.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InputMissing(_) | Self::ExtractionEmpty)
    }
}

/// Result type for precis operations.
pub type Result<T> = std::result::Result<T, Error>;
