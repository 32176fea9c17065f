//! `speak`: synthesize a line of text and stream the audio bytes to stdout.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use speechbench::engine::RestEngine;
use speechbench::synth;

/// Synthesize text to speech, raw audio bytes on stdout.
#[derive(Parser, Debug)]
#[command(name = "speak")]
#[command(about = "Synthesize text to speech, raw audio bytes on stdout")]
#[command(version)]
struct Args {
    /// Text to synthesize
    #[arg(long)]
    text: String,

    /// Voice identifier
    #[arg(long, default_value = "en-US-JennyNeural")]
    voice: String,

    /// Output audio format (becomes the engine's output file extension)
    #[arg(long, default_value = "mp3")]
    format: String,

    /// Synthesis endpoint; overrides TTS_API_URL
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the audio stream; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    anyhow::ensure!(!args.text.trim().is_empty(), "--text must not be empty");

    let engine = match args.endpoint {
        Some(endpoint) => RestEngine::new(endpoint),
        None => RestEngine::from_env(),
    };

    let audio = synth::synthesize_to_bytes(&engine, &args.text, &args.voice, &args.format)
        .await
        .context("Failed to synthesize speech")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&audio)?;
    stdout.flush()?;

    Ok(())
}
