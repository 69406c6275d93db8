//! Configuration: TOML file, then `PRECIS_*` environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::respond::{FailurePolicy, GenerationPolicy};
use crate::{ChunkCapacity, Error, Mode, Result};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Chunk sizing.
    pub chunking: ChunkingConfig,
    /// Generation backend and call policy.
    pub generation: GenerationConfig,
    /// Model names per mode.
    pub models: ModelsConfig,
    /// Export settings.
    pub output: OutputConfig,
}

/// `[chunking]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingConfig {
    /// Maximum words per chunk.
    pub words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            words: ChunkCapacity::DEFAULT_WORDS,
        }
    }
}

/// `[generation]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Base URL of the Ollama-compatible server.
    pub endpoint: String,
    /// Output cap per call.
    pub max_output_tokens: u32,
    /// Per-chunk timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
    /// Extra attempts per chunk.
    pub retries: u32,
    /// Base retry backoff in milliseconds.
    pub backoff_ms: u64,
    /// Chunks in flight at once.
    pub parallelism: usize,
    /// What to do when a chunk fails for good.
    pub on_failure: FailurePolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".into(),
            max_output_tokens: 256,
            timeout_secs: 120,
            retries: 0,
            backoff_ms: 500,
            parallelism: 1,
            on_failure: FailurePolicy::Abort,
        }
    }
}

impl GenerationConfig {
    /// Per-chunk timeout, if enabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// The call policy these settings describe.
    #[must_use]
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            timeout: self.timeout(),
            retries: self.retries,
            backoff: Duration::from_millis(self.backoff_ms),
            parallelism: self.parallelism,
            on_failure: self.on_failure,
        }
    }
}

/// `[models]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Model for summary mode.
    pub summary: String,
    /// Model for custom-prompt mode.
    pub custom: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            summary: "flan-t5-base".into(),
            custom: "flan-t5-large".into(),
        }
    }
}

impl ModelsConfig {
    /// Model name configured for `mode`.
    #[must_use]
    pub fn for_mode(&self, mode: Mode) -> &str {
        match mode {
            Mode::SummaryOnly => &self.summary,
            Mode::CustomPrompt => &self.custom,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name of the plain-text export.
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: crate::EXPORT_FILE_NAME.into(),
        }
    }
}

impl Config {
    /// Parse config from a TOML string, apply env overrides, and validate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or invalid values.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_str).map_err(|e| Error::Config(e.to_string()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_toml`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Defaults plus env overrides, for running without a config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if an override produces an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_toml("")
    }

    /// The chunk capacity these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `chunking.words` is 0.
    pub fn capacity(&self) -> Result<ChunkCapacity> {
        ChunkCapacity::new(self.chunking.words)
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.words == 0 {
            return Err(Error::Config("chunking.words must be > 0".into()));
        }
        if self.generation.parallelism == 0 {
            return Err(Error::Config("generation.parallelism must be > 0".into()));
        }
        if self.generation.endpoint.trim().is_empty() {
            return Err(Error::Config("generation.endpoint must not be empty".into()));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(Error::Config("output.file_name must not be empty".into()));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// Convention: `PRECIS_SECTION_KEY` overrides `section.key`. Values that
    /// fail to parse are ignored.
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PRECIS_CHUNKING_WORDS").and_then(|v| v.parse().ok()) {
            self.chunking.words = v;
        }
        if let Some(v) = var("PRECIS_GENERATION_ENDPOINT") {
            self.generation.endpoint = v;
        }
        if let Some(v) = var("PRECIS_GENERATION_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.generation.timeout_secs = v;
        }
        if let Some(v) = var("PRECIS_GENERATION_RETRIES").and_then(|v| v.parse().ok()) {
            self.generation.retries = v;
        }
        if let Some(v) = var("PRECIS_GENERATION_PARALLELISM").and_then(|v| v.parse().ok()) {
            self.generation.parallelism = v;
        }
        if let Some(v) = var("PRECIS_MODELS_SUMMARY") {
            self.models.summary = v;
        }
        if let Some(v) = var("PRECIS_MODELS_CUSTOM") {
            self.models.custom = v;
        }
    }
}
