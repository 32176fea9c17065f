//! Whisper-backed transcription.

use std::path::{Path, PathBuf};

use transcribe_rs::TranscriptionEngine;
use transcribe_rs::engines::whisper::WhisperEngine;

use super::{AsrError, Transcriber};
use crate::audio;

/// Default model file: int8-quantized "small" whisper, CPU inference.
pub const DEFAULT_MODEL_PATH: &str = "models/ggml-small-q8_0.bin";

/// Speech recognizer backed by a local whisper model.
///
/// Loading is a one-time cost paid before a batch; the loaded model is then
/// reused for every file.
pub struct WhisperTranscriber {
    engine: WhisperEngine,
}

impl WhisperTranscriber {
    /// Load the whisper model at `model_path`.
    pub fn load(model_path: &Path) -> Result<Self, AsrError> {
        let mut engine = WhisperEngine::new();
        engine
            .load_model(model_path)
            .map_err(|e| AsrError::ModelLoad(e.to_string()))?;
        Ok(Self { engine })
    }

    /// Model path from `WHISPER_MODEL_PATH`, falling back to
    /// [`DEFAULT_MODEL_PATH`].
    pub fn model_path_from_env() -> PathBuf {
        std::env::var("WHISPER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&mut self, path: &Path) -> Result<String, AsrError> {
        let samples = audio::load_wav_mono_16k(path)?;

        let result = self
            .engine
            .transcribe_samples(samples, None)
            .map_err(|e| AsrError::Engine(e.to_string()))?;

        // The engine emits segment texts with their own padding; collapse
        // to single-spaced, trimmed hypothesis text.
        Ok(result
            .text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "))
    }
}
