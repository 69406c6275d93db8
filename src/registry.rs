//! Per-mode model loading.
//!
//! Loading a model is expensive, so each mode's generation capability is
//! built at most once per registry and shared after that. The registry is an
//! ordinary value: the caller creates it, keeps it for the process lifetime,
//! and passes the resolved [`Generator`] into the pipeline.
//!
//! ```text
//! get(SummaryOnly) → load → cache → Arc<dyn Generator>
//! get(SummaryOnly) →        cache → same Arc
//! get(CustomPrompt) → load → cache → Arc<dyn Generator>
//! ```

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::model::Generator;
use crate::Result;

/// Which model configuration a request runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Mode {
    /// Summarize with the fixed default prompt on the smaller model.
    #[default]
    #[value(name = "summary")]
    SummaryOnly,
    /// Answer a caller-supplied prompt on the larger model.
    #[value(name = "custom")]
    CustomPrompt,
}

impl Mode {
    /// Prompt used in summary mode.
    pub const SUMMARY_PROMPT: &'static str = "Summarize this document in 5 concise bullet points:";

    /// Human-readable name of the mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SummaryOnly => "Summary Only",
            Self::CustomPrompt => "Custom Prompt",
        }
    }

    /// The prompt this mode supplies on its own, if any.
    #[must_use]
    pub const fn default_prompt(self) -> Option<&'static str> {
        match self {
            Self::SummaryOnly => Some(Self::SUMMARY_PROMPT),
            Self::CustomPrompt => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

type Loader = dyn Fn(Mode) -> Result<Arc<dyn Generator>> + Send + Sync;

/// Lazily-built, memoized generation capability per [`Mode`].
///
/// ```rust
/// use std::sync::Arc;
/// use precis::{GenerationError, Generator, Mode, ModelRegistry};
///
/// let registry = ModelRegistry::new(|_mode| {
///     let echo = |input: &str| -> Result<String, GenerationError> { Ok(input.to_string()) };
///     Ok(Arc::new(echo) as Arc<dyn Generator>)
/// });
///
/// let a = registry.get(Mode::SummaryOnly).unwrap();
/// let b = registry.get(Mode::SummaryOnly).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ModelRegistry {
    loader: Box<Loader>,
    summary: OnceCell<Arc<dyn Generator>>,
    custom: OnceCell<Arc<dyn Generator>>,
}

impl ModelRegistry {
    /// Create a registry that builds generators with `loader`.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn(Mode) -> Result<Arc<dyn Generator>> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            summary: OnceCell::new(),
            custom: OnceCell::new(),
        }
    }

    fn slot(&self, mode: Mode) -> &OnceCell<Arc<dyn Generator>> {
        match mode {
            Mode::SummaryOnly => &self.summary,
            Mode::CustomPrompt => &self.custom,
        }
    }

    /// The generator for `mode`, loading it on first use.
    ///
    /// A failed load is not cached; the next call tries again.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub fn get(&self, mode: Mode) -> Result<Arc<dyn Generator>> {
        self.slot(mode)
            .get_or_try_init(|| {
                let generator = (self.loader)(mode)?;
                info!(mode = %mode, model = generator.name(), "model loaded");
                Ok(generator)
            })
            .cloned()
    }

    /// Whether the generator for `mode` has already been loaded.
    #[must_use]
    pub fn is_loaded(&self, mode: Mode) -> bool {
        self.slot(mode).get().is_some()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("summary_loaded", &self.is_loaded(Mode::SummaryOnly))
            .field("custom_loaded", &self.is_loaded(Mode::CustomPrompt))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, GenerationError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_registry(loads: Arc<AtomicUsize>) -> ModelRegistry {
        ModelRegistry::new(move |mode| {
            loads.fetch_add(1, Ordering::SeqCst);
            let tag = mode.label();
            let generator = move |input: &str| -> std::result::Result<String, GenerationError> {
                Ok(format!("{tag}: {input}"))
            };
            Ok(Arc::new(generator) as Arc<dyn Generator>)
        })
    }

    #[test]
    fn test_loads_once_per_mode() {
        let loads = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(Arc::clone(&loads));

        let first = registry.get(Mode::SummaryOnly).unwrap();
        let again = registry.get(Mode::SummaryOnly).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let custom = registry.get(Mode::CustomPrompt).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(custom.generate("q").unwrap(), "Custom Prompt: q");
    }

    #[test]
    fn test_nothing_loaded_up_front() {
        let loads = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(Arc::clone(&loads));
        assert!(!registry.is_loaded(Mode::SummaryOnly));
        assert!(!registry.is_loaded(Mode::CustomPrompt));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let registry = ModelRegistry::new(move |mode| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(Error::ModelLoad {
                    mode,
                    reason: "not yet".into(),
                });
            }
            let echo = |input: &str| -> std::result::Result<String, GenerationError> { Ok(input.to_string()) };
            Ok(Arc::new(echo) as Arc<dyn Generator>)
        });

        assert!(registry.get(Mode::CustomPrompt).is_err());
        assert!(!registry.is_loaded(Mode::CustomPrompt));
        assert!(registry.get(Mode::CustomPrompt).is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mode_labels_and_prompts() {
        assert_eq!(Mode::SummaryOnly.to_string(), "Summary Only");
        assert_eq!(Mode::CustomPrompt.default_prompt(), None);
        assert_eq!(
            Mode::SummaryOnly.default_prompt(),
            Some("Summarize this document in 5 concise bullet points:")
        );
    }
}
