//! speechbench: TTS smoke testing and ASR accuracy evaluation.
//!
//! This crate provides command-line tools for exercising a text-to-speech
//! service and scoring its output: synthesize text (`speak`), run a golden
//! dataset against the service (`smoke`), transcribe the results and compute
//! word/character error rates (`wer-eval`), and render an HTML quality
//! report (`report`). A local stand-in service (`mock-server`) covers
//! development without the real engine.

pub mod asr;
pub mod audio;
pub mod engine;
pub mod eval;
pub mod metrics;
pub mod report;
pub mod smoke;
pub mod synth;
