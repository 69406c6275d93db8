//! Per-chunk generation and aggregation.
//!
//! Every chunk is sent to the model as its own request, with the prompt
//! prepended:
//!
//! ```text
//! prompt = "Summarize:"
//! chunks = ["w1 .. w500", "w501 .. w1000", "w1001 .. w1200"]
//!
//! "Summarize:\nw1 .. w500"        → fragment 0
//! "Summarize:\nw501 .. w1000"     → fragment 1
//! "Summarize:\nw1001 .. w1200"    → fragment 2
//!
//! response = fragment 0 + "\n" + fragment 1 + "\n" + fragment 2
//! ```
//!
//! ## Ordering
//!
//! Fragment `i` always answers chunk `i`, and the response lists fragments
//! in chunk order. By default chunks are generated one after another on the
//! calling thread. With `parallelism > 1` they are dispatched on a rayon
//! pool; rayon's indexed `collect` keeps results in chunk order no matter
//! which call finishes first.
//!
//! ## Failures
//!
//! Each call may be bounded by a timeout and retried with exponential
//! backoff. A chunk that still fails is handled per [`FailurePolicy`]:
//!
//! | Policy | Result |
//! |--------|--------|
//! | `Abort` (default) | The whole request fails with the first failing chunk's error |
//! | `Placeholder` | The fragment becomes `[chunk N failed: reason]`, the rest go on |

use std::sync::{mpsc, Arc};
use std::time::Duration;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{GenerationError, Generator};
use crate::{Chunker, Error, Result, Slab, WordChunker};

/// What to do with a chunk whose generation failed after all retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole request.
    #[default]
    Abort,
    /// Substitute a marker fragment and continue.
    Placeholder,
}

/// Timeout, retry, concurrency and failure settings for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Per-call time limit; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff: Duration,
    /// Number of chunks in flight at once.
    pub parallelism: usize,
    /// Handling of chunks that fail after all retries.
    pub on_failure: FailurePolicy,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            retries: 0,
            backoff: Duration::from_millis(500),
            parallelism: 1,
            on_failure: FailurePolicy::Abort,
        }
    }
}

/// Join generated fragments with newlines, in order.
///
/// ```rust
/// use precis::aggregate;
///
/// assert_eq!(aggregate(&["a".to_string(), "b".to_string()]), "a\nb");
/// assert_eq!(aggregate(&[]), "");
/// ```
#[must_use]
pub fn aggregate(fragments: &[String]) -> String {
    fragments.join("\n")
}

/// Build the model input for one chunk.
fn model_input(prompt: &str, chunk: &str) -> String {
    format!("{prompt}\n{chunk}")
}

/// Runs the prompt against every chunk of a text.
pub struct ResponseGenerator {
    chunker: WordChunker,
    policy: GenerationPolicy,
}

impl ResponseGenerator {
    /// Create a response generator.
    #[must_use]
    pub fn new(chunker: WordChunker, policy: GenerationPolicy) -> Self {
        Self { chunker, policy }
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Generate one fragment per chunk of `text`, in chunk order.
    ///
    /// Empty text yields no chunks, no model calls, and no fragments.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns [`Error::Generation`] for the
    /// lowest-indexed chunk that failed.
    pub fn fragments(&self, text: &str, prompt: &str, generator: &Arc<dyn Generator>) -> Result<Vec<String>> {
        let slabs = self.chunker.chunk(text);
        debug!(chunks = slabs.len(), model = generator.name(), "generating fragments");

        if slabs.is_empty() {
            return Ok(Vec::new());
        }

        let outcomes = if self.policy.parallelism > 1 && slabs.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.policy.parallelism)
                .build()
                .map_err(|e| Error::Config(format!("cannot build generation pool: {e}")))?;
            pool.install(|| {
                slabs
                    .par_iter()
                    .map(|slab| self.generate_chunk(slab, prompt, generator))
                    .collect::<Vec<_>>()
            })
        } else {
            let mut outcomes = Vec::with_capacity(slabs.len());
            for slab in &slabs {
                let outcome = self.generate_chunk(slab, prompt, generator);
                let failed = outcome.is_err();
                outcomes.push(outcome);
                if failed && self.policy.on_failure == FailurePolicy::Abort {
                    break;
                }
            }
            outcomes
        };

        outcomes
            .into_iter()
            .enumerate()
            .map(|(chunk, outcome)| match outcome {
                Ok(fragment) => Ok(fragment),
                Err(source) => match self.policy.on_failure {
                    FailurePolicy::Abort => Err(Error::Generation { chunk, source }),
                    FailurePolicy::Placeholder => {
                        warn!(chunk, error = %source, "substituting placeholder for failed chunk");
                        Ok(format!("[chunk {chunk} failed: {source}]"))
                    }
                },
            })
            .collect()
    }

    /// Generate fragments for `text` and aggregate them into one response.
    ///
    /// # Errors
    ///
    /// As [`ResponseGenerator::fragments`].
    pub fn respond(&self, text: &str, prompt: &str, generator: &Arc<dyn Generator>) -> Result<String> {
        let fragments = self.fragments(text, prompt, generator)?;
        Ok(aggregate(&fragments))
    }

    /// One chunk, with retries.
    fn generate_chunk(
        &self,
        slab: &Slab,
        prompt: &str,
        generator: &Arc<dyn Generator>,
    ) -> std::result::Result<String, GenerationError> {
        let input = model_input(prompt, &slab.text);
        let mut attempt = 0;
        loop {
            match self.call(&input, generator) {
                Ok(fragment) => {
                    debug!(chunk = slab.index, words = slab.words, bytes = slab.len(), attempt, "chunk generated");
                    return Ok(fragment);
                }
                Err(e) if attempt < self.policy.retries => {
                    let delay = self.policy.backoff.saturating_mul(1 << attempt.min(16));
                    warn!(chunk = slab.index, attempt, error = %e, ?delay, "generation failed, retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One attempt, bounded by the timeout if set.
    fn call(&self, input: &str, generator: &Arc<dyn Generator>) -> std::result::Result<String, GenerationError> {
        let Some(timeout) = self.policy.timeout else {
            return generator.generate(input);
        };

        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(generator);
        let input = input.to_string();
        std::thread::spawn(move || {
            // The receiver is gone if the call already timed out
            let _ = tx.send(worker.generate(&input));
        });

        match rx.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(GenerationError::TimedOut(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(GenerationError::backend("generation thread exited without a result"))
            }
        }
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new(WordChunker::default(), GenerationPolicy::default())
    }
}
