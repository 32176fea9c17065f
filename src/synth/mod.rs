//! Synthesis runner core.
//!
//! Drives a single synthesis request to completion: the engine saves its
//! audio into a scoped temporary directory and the bytes are handed back to
//! the caller untouched.

use std::fs;

use thiserror::Error;

use crate::engine::{EngineError, SpeechEngine};

/// Errors that can occur while running a synthesis request.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synthesize `text` with `voice` and return the raw audio bytes.
///
/// The engine writes `out.<format>` inside a temporary directory that is
/// removed when this function returns, on success and on error alike.
pub async fn synthesize_to_bytes<E: SpeechEngine>(
    engine: &E,
    text: &str,
    voice: &str,
    format: &str,
) -> Result<Vec<u8>, SynthError> {
    let dir = tempfile::tempdir()?;
    let out_path = dir.path().join(format!("out.{format}"));

    engine.save(text, voice, &out_path).await?;

    let audio = fs::read(&out_path)?;
    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockSpeechEngine;
    use std::ffi::OsStr;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_synthesize_returns_engine_bytes_verbatim() {
        let mut engine = MockSpeechEngine::new();
        engine.expect_save().times(1).returning(|_, _, path| {
            std::fs::write(path, [0x49, 0x44, 0x33]).unwrap();
            Ok(())
        });

        let audio = synthesize_to_bytes(&engine, "hi", "en-US-JennyNeural", "mp3")
            .await
            .unwrap();

        assert_eq!(audio, vec![0x49, 0x44, 0x33]);
    }

    #[tokio::test]
    async fn test_output_file_named_after_format() {
        let mut engine = MockSpeechEngine::new();
        engine
            .expect_save()
            .withf(|_, _, path| path.file_name() == Some(OsStr::new("out.ogg")))
            .times(1)
            .returning(|_, _, path| {
                std::fs::write(path, b"x").unwrap();
                Ok(())
            });

        synthesize_to_bytes(&engine, "hi", "en-US-JennyNeural", "ogg")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_temp_dir_removed_after_success() {
        let seen: Arc<Mutex<Option<PathBuf>>> = Arc::new(Mutex::new(None));
        let seen_in_mock = Arc::clone(&seen);

        let mut engine = MockSpeechEngine::new();
        engine.expect_save().returning(move |_, _, path| {
            *seen_in_mock.lock().unwrap() = Some(path.to_path_buf());
            std::fs::write(path, b"x").unwrap();
            Ok(())
        });

        synthesize_to_bytes(&engine, "hi", "en-US-JennyNeural", "mp3")
            .await
            .unwrap();

        let out_path = seen.lock().unwrap().clone().unwrap();
        assert!(!out_path.exists());
        assert!(!out_path.parent().unwrap().exists());
    }

    #[tokio::test]
    async fn test_temp_dir_removed_after_engine_failure() {
        let seen: Arc<Mutex<Option<PathBuf>>> = Arc::new(Mutex::new(None));
        let seen_in_mock = Arc::clone(&seen);

        let mut engine = MockSpeechEngine::new();
        engine.expect_save().returning(move |_, _, path| {
            *seen_in_mock.lock().unwrap() = Some(path.to_path_buf());
            Err(EngineError::RequestFailed("Status: 500".to_string()))
        });

        let result = synthesize_to_bytes(&engine, "hi", "en-US-JennyNeural", "mp3").await;

        assert!(matches!(result.unwrap_err(), SynthError::Engine(_)));
        let out_path = seen.lock().unwrap().clone().unwrap();
        assert!(!out_path.parent().unwrap().exists());
    }
}
