//! One request, end to end.
//!
//! ```text
//! Request { document, prompt, mode }
//!    │
//!    ├─ validate ────────── InputMissing          ┐
//!    ├─ extract_text ───── ExtractionEmpty       │ prepare
//!    ├─ normalize                                ┘
//!    ▼
//! Prepared { text, words, prompt, mode }
//!    ├─ registry.get(mode)   (loaded once, reused) ┐
//!    ├─ chunk → generate per chunk → aggregate     │ generate
//!    ▼                                             ┘
//! Report { response, words, chunks }
//! ```
//!
//! Nothing here prints or renders. A front end that wants to show progress
//! calls [`Summarizer::prepare`], reports the word count, then calls
//! [`Summarizer::generate`]; one that doesn't calls [`Summarizer::process`].
//! No model is loaded until `generate`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::extract::{extract_text, PageSource, PdfDocument};
use crate::model::Generator;
use crate::ollama::OllamaGenerator;
use crate::registry::{Mode, ModelRegistry};
use crate::respond::ResponseGenerator;
use crate::{normalize, word_count, Error, MissingInput, Result, WordChunker};

/// Default file name of the plain-text export.
pub const EXPORT_FILE_NAME: &str = "summary.txt";

/// A single user request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Request<'a> {
    /// The PDF bytes.
    pub document: Option<&'a [u8]>,
    /// The caller's prompt. Ignored in summary mode.
    pub prompt: Option<&'a str>,
    /// Which model configuration to run against.
    pub mode: Mode,
}

impl<'a> Request<'a> {
    /// A request for `document` in `mode` with no caller prompt.
    #[must_use]
    pub const fn new(document: &'a [u8], mode: Mode) -> Self {
        Self {
            document: Some(document),
            prompt: None,
            mode,
        }
    }

    /// Attach a caller prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// The prompt to run, as [`resolve_prompt`] picks it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputMissing`] in custom mode without a prompt.
    pub fn resolved_prompt(&self) -> Result<&'a str> {
        resolve_prompt(self.mode, self.prompt)
    }

    fn document(&self) -> Result<&'a [u8]> {
        self.document
            .filter(|d| !d.is_empty())
            .ok_or(Error::InputMissing(MissingInput::Document))
    }
}

/// The prompt a request in `mode` runs.
///
/// Summary mode always runs [`Mode::SUMMARY_PROMPT`] and ignores `prompt`.
/// Custom mode runs `prompt`, which must be non-blank.
///
/// # Errors
///
/// Returns [`Error::InputMissing`] in custom mode when `prompt` is absent or
/// blank.
pub fn resolve_prompt(mode: Mode, prompt: Option<&str>) -> Result<&str> {
    match mode.default_prompt() {
        Some(fixed) => Ok(fixed),
        None => prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or(Error::InputMissing(MissingInput::Prompt)),
    }
}

/// A request that passed extraction and normalization, ready for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    /// Normalized document text.
    pub text: String,
    /// Words in `text`.
    pub words: usize,
    /// The prompt run against each chunk.
    pub prompt: String,
    /// The mode whose model answers.
    pub mode: Mode,
}

/// The outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The final response text.
    pub response: String,
    /// Words in the normalized document text.
    pub words: usize,
    /// Number of chunks sent to the model.
    pub chunks: usize,
}

impl Report {
    /// Write the response as plain text to `dir/file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn export(&self, dir: impl AsRef<Path>, file_name: &str) -> Result<PathBuf> {
        let path = dir.as_ref().join(file_name);
        std::fs::write(&path, &self.response)?;
        info!(path = %path.display(), bytes = self.response.len(), "response exported");
        Ok(path)
    }
}

/// Run normalize → chunk → generate → aggregate over already-extracted text.
///
/// # Errors
///
/// As [`ResponseGenerator::fragments`].
pub fn respond_to_text(
    document_text: &str,
    prompt: &str,
    responder: &ResponseGenerator,
    generator: &Arc<dyn Generator>,
) -> Result<Report> {
    let text = normalize(document_text);
    let words = word_count(&text);
    respond_to_normalized(&text, words, prompt, responder, generator)
}

fn respond_to_normalized(
    text: &str,
    words: usize,
    prompt: &str,
    responder: &ResponseGenerator,
    generator: &Arc<dyn Generator>,
) -> Result<Report> {
    let fragments = responder.fragments(text, prompt, generator)?;
    Ok(Report {
        chunks: fragments.len(),
        response: crate::aggregate(&fragments),
        words,
    })
}

/// Extract from `pages`, then [`respond_to_text`].
///
/// # Errors
///
/// Returns [`Error::ExtractionEmpty`] if the pages carry no text, before
/// `generator` is touched.
pub fn respond_to_pages(
    pages: &dyn PageSource,
    prompt: &str,
    responder: &ResponseGenerator,
    generator: &Arc<dyn Generator>,
) -> Result<Report> {
    let text = extract_text(pages)?;
    respond_to_text(&text, prompt, responder, generator)
}

/// Long-lived request processor: one registry, one responder.
pub struct Summarizer {
    registry: ModelRegistry,
    responder: ResponseGenerator,
}

impl Summarizer {
    /// Assemble from parts.
    #[must_use]
    pub fn new(registry: ModelRegistry, responder: ResponseGenerator) -> Self {
        Self { registry, responder }
    }

    /// Build from config, with Ollama-backed generators per mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let responder = ResponseGenerator::new(WordChunker::new(config.capacity()?), config.generation.policy());

        let generation = config.generation.clone();
        let models = config.models.clone();
        let registry = ModelRegistry::new(move |mode| {
            let model = models.for_mode(mode);
            let generator = OllamaGenerator::new(
                generation.endpoint.clone(),
                model,
                generation.max_output_tokens,
                generation.timeout(),
            )
            .map_err(|e| Error::ModelLoad {
                mode,
                reason: e.to_string(),
            })?;
            Ok(Arc::new(generator) as Arc<dyn Generator>)
        });

        Ok(Self::new(registry, responder))
    }

    /// The model registry.
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Process one request from raw PDF bytes: [`prepare`](Self::prepare),
    /// then [`generate`](Self::generate).
    ///
    /// # Errors
    ///
    /// Any error from either step.
    pub fn process(&self, request: &Request<'_>) -> Result<Report> {
        let prepared = self.prepare(request)?;
        self.generate(&prepared)
    }

    /// Process one request from an already-opened page source.
    ///
    /// # Errors
    ///
    /// As [`Summarizer::process`], minus the PDF parsing errors.
    pub fn process_pages(&self, pages: &dyn PageSource, prompt: Option<&str>, mode: Mode) -> Result<Report> {
        let prepared = self.prepare_pages(pages, prompt, mode)?;
        self.generate(&prepared)
    }

    /// Validate, extract and normalize one request. Loads no model.
    ///
    /// # Errors
    ///
    /// [`Error::InputMissing`] for a missing document or prompt,
    /// [`Error::Pdf`] for unreadable bytes, [`Error::ExtractionEmpty`] for a
    /// document without text.
    pub fn prepare(&self, request: &Request<'_>) -> Result<Prepared> {
        let document = request.document()?;
        request.resolved_prompt()?;
        let pdf = PdfDocument::from_bytes(document)?;
        self.prepare_pages(&pdf, request.prompt, request.mode)
    }

    /// [`prepare`](Self::prepare) over an already-opened page source.
    ///
    /// # Errors
    ///
    /// As [`Summarizer::prepare`], minus the PDF parsing errors.
    pub fn prepare_pages(&self, pages: &dyn PageSource, prompt: Option<&str>, mode: Mode) -> Result<Prepared> {
        let prompt = resolve_prompt(mode, prompt)?;
        let text = normalize(&extract_text(pages)?);
        let words = word_count(&text);
        info!(words, mode = %mode, "extracted words from the document");

        Ok(Prepared {
            text,
            words,
            prompt: prompt.to_string(),
            mode,
        })
    }

    /// Load the mode's model if needed and answer a prepared request.
    ///
    /// # Errors
    ///
    /// [`Error::ModelLoad`] or [`Error::Generation`].
    pub fn generate(&self, prepared: &Prepared) -> Result<Report> {
        let generator = self.registry.get(prepared.mode)?;
        let report = respond_to_normalized(
            &prepared.text,
            prepared.words,
            &prepared.prompt,
            &self.responder,
            &generator,
        )?;

        info!(
            mode = %prepared.mode,
            words = report.words,
            chunks = report.chunks,
            response_bytes = report.response.len(),
            "request complete"
        );
        Ok(report)
    }
}
