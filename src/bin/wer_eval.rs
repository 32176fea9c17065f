//! `wer-eval`: transcribe a batch of audio files and score WER/CER against
//! their reference texts.

use std::env;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use speechbench::asr::WhisperTranscriber;
use speechbench::eval;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let Some(csv_path) = env::args().nth(1) else {
        println!("Usage: wer-eval outputs/run_results.csv");
        process::exit(1);
    };

    let model_path = WhisperTranscriber::model_path_from_env();
    info!("Loading whisper model from {}", model_path.display());
    let mut transcriber = WhisperTranscriber::load(&model_path)
        .with_context(|| format!("Failed to load model at {}", model_path.display()))?;

    let out_csv = eval::run_eval(Path::new(&csv_path), &mut transcriber)
        .with_context(|| format!("Evaluation failed for {csv_path}"))?;

    println!("Wrote {}", out_csv.display());
    Ok(())
}
