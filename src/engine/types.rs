//! Synthesis service request types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the synthesis service.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request body for the `/synthesize` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    pub voice: String,
    pub format: String,
}

impl SynthesizeRequest {
    /// Create a new synthesis request.
    pub fn new(
        text: impl Into<String>,
        voice: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            format: format.into(),
        }
    }
}
