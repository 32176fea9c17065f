//! `smoke`: synthesize the golden dataset and record latency results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use speechbench::engine::DEFAULT_ENDPOINT;
use speechbench::smoke::{self, RUN_RESULTS_FILE};

/// Run the golden dataset against the synthesis service.
#[derive(Parser, Debug)]
#[command(name = "smoke")]
#[command(about = "Synthesize the golden dataset and record latency results")]
#[command(version)]
struct Args {
    /// Synthesis endpoint; overrides TTS_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// Directory for audio files and run_results.csv
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,

    /// Audio format requested from the service
    #[arg(long, default_value = "mp3")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let api_url = args
        .api_url
        .or_else(|| std::env::var("TTS_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let results = smoke::run_smoke(&api_url, &args.out_dir, &args.format)
        .await
        .context("Smoke run failed")?;

    let csv_path = args.out_dir.join(RUN_RESULTS_FILE);
    smoke::write_run_results(&results, &csv_path)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    println!("Wrote {}", csv_path.display());
    Ok(())
}
