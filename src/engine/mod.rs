//! Communication with the external text-to-speech engine.
//!
//! Provides the trait the synthesis runner talks through and the HTTP
//! client implementation for a `/synthesize` service endpoint.

mod rest;
mod types;

pub use rest::{DEFAULT_ENDPOINT, RestEngine};
pub use types::{EngineError, SynthesizeRequest};

use std::path::Path;

use async_trait::async_trait;

/// Trait for the external text-to-speech engine.
///
/// One capability: synthesize speech for a text/voice pair and save the
/// audio to a file. The call is asynchronous; callers issue exactly one
/// request and await its completion. Mock implementations stand in for the
/// cloud service in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Synthesize speech and write the audio to `out_path`.
    ///
    /// The delivered encoding follows `out_path`'s extension: `.mp3`
    /// requests mp3, anything else requests wav.
    async fn save(&self, text: &str, voice: &str, out_path: &Path) -> Result<(), EngineError>;
}
