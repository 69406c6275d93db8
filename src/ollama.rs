//! Generation over an Ollama-compatible HTTP API.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::model::{GenerationError, Generator};

/// Blocking client for `POST {url}/api/generate`.
///
/// Each call is a single non-streaming completion capped at
/// `max_output_tokens`. Inputs longer than the model's context window are
/// truncated by the server.
pub struct OllamaGenerator {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    max_output_tokens: u32,
}

impl OllamaGenerator {
    /// Create a client for `model` served at `url`.
    ///
    /// `timeout` bounds each HTTP request; `None` waits indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the HTTP client cannot be built.
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        max_output_tokens: u32,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_output_tokens,
        })
    }

    fn request_body(&self, input: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "prompt": input,
            "stream": false,
            "options": {
                "num_predict": self.max_output_tokens,
            },
        })
    }
}

/// Pull the generated text out of a `/api/generate` response.
fn parse_response(resp: &serde_json::Value) -> Result<String, GenerationError> {
    resp["response"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| GenerationError::Parse("missing response field".into()))
}

impl Generator for OllamaGenerator {
    fn generate(&self, input: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.url);
        debug!(model = %self.model, input_bytes = input.len(), "generate request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(input))
            .send()?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let resp: serde_json::Value = response.json()?;
        parse_response(&resp)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
