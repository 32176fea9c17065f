//! HTTP client for the synthesis service.

use std::path::Path;

use async_trait::async_trait;

use super::SpeechEngine;
use super::types::{EngineError, SynthesizeRequest};

/// Endpoint used when neither a flag nor `TTS_API_URL` overrides it.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/synthesize";

/// Client for an HTTP synthesis service.
pub struct RestEngine {
    endpoint: String,
    client: reqwest::Client,
}

impl RestEngine {
    /// Create a client for the given `/synthesize` endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the `TTS_API_URL` environment variable,
    /// falling back to [`DEFAULT_ENDPOINT`].
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("TTS_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint)
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechEngine for RestEngine {
    async fn save(&self, text: &str, voice: &str, out_path: &Path) -> Result<(), EngineError> {
        // The delivered encoding follows the output file's extension.
        let format = match out_path.extension().and_then(|e| e.to_str()) {
            Some("mp3") => "mp3",
            _ => "wav",
        };

        let request = SynthesizeRequest::new(text, voice, format);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::RequestFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;

        std::fs::write(out_path, &audio)?;

        Ok(())
    }
}
