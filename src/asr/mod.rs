//! Speech recognition behind a narrow seam.
//!
//! The evaluation batch only needs one operation from the model, so it is
//! expressed as a trait; mock implementations stand in for whisper in tests.

mod whisper;

pub use whisper::{DEFAULT_MODEL_PATH, WhisperTranscriber};

use std::path::Path;

use thiserror::Error;

use crate::audio::AudioError;

/// Errors that can occur while loading the model or transcribing.
#[derive(Error, Debug)]
pub enum AsrError {
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Transcription failed: {0}")]
    Engine(String),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
}

/// Trait for the speech-recognition model.
#[cfg_attr(test, mockall::automock)]
pub trait Transcriber {
    /// Transcribe the audio file at `path` into hypothesis text.
    fn transcribe(&mut self, path: &Path) -> Result<String, AsrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transcriber_returns_text() {
        let mut mock = MockTranscriber::new();

        mock.expect_transcribe()
            .times(1)
            .returning(|_| Ok("hello world".to_string()));

        let text = mock.transcribe(Path::new("case.wav")).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn test_mock_transcriber_failure() {
        let mut mock = MockTranscriber::new();

        mock.expect_transcribe()
            .times(1)
            .returning(|_| Err(AsrError::Engine("decode failed".to_string())));

        let result = mock.transcribe(Path::new("case.wav"));
        assert!(matches!(result.unwrap_err(), AsrError::Engine(_)));
    }

    #[test]
    fn test_default_model_path_from_env_fallback() {
        // Only exercise the fallback; the env var is unset in tests.
        if std::env::var("WHISPER_MODEL_PATH").is_err() {
            assert_eq!(
                WhisperTranscriber::model_path_from_env(),
                std::path::PathBuf::from(DEFAULT_MODEL_PATH)
            );
        }
    }
}
