//! The generation capability.
//!
//! A pretrained text-generation model, seen from the pipeline, is a function
//! from an input string to an output string that may fail. [`Generator`] is
//! that seam, so backends (HTTP servers, local runtimes, test stubs) plug in
//! without the pipeline knowing which one it is talking to.

use std::time::Duration;

/// A text-generation backend.
///
/// Implementations decide their own output cap and what to do with inputs
/// longer than the model's window (usually: truncate).
///
/// Closures implement this trait, which makes stubbing trivial:
///
/// ```rust
/// use precis::{GenerationError, Generator};
///
/// let echo = |input: &str| -> Result<String, GenerationError> {
///     Ok(format!("<<{input}>>"))
/// };
/// assert_eq!(echo.generate("hi").unwrap(), "<<hi>>");
/// ```
pub trait Generator: Send + Sync {
    /// Produce the model's output for `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the backend cannot produce output.
    fn generate(&self, input: &str) -> Result<String, GenerationError>;

    /// Short name of the backing model, for logs.
    fn name(&self) -> &str {
        "generator"
    }
}

impl<F> Generator for F
where
    F: Fn(&str) -> Result<String, GenerationError> + Send + Sync,
{
    fn generate(&self, input: &str) -> Result<String, GenerationError> {
        self(input)
    }
}

/// Ways a single generation call can fail.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request never got a response.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The backend's response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The call did not finish within the per-chunk timeout.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other backend-defined failure.
    #[error("{0}")]
    Backend(String),
}

impl GenerationError {
    /// Build a backend-defined error from any message.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
