//! `report`: render the HTML quality report from result CSVs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use speechbench::report;

/// Render report.html from run_results.csv and wer_results.csv.
#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Render the HTML quality report from result CSVs")]
#[command(version)]
struct Args {
    /// Directory holding run_results.csv and, optionally, wer_results.csv
    #[arg(long, default_value = "outputs")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let out = report::render_report(&args.dir).context("Failed to render report")?;

    println!("Wrote {}", out.display());
    Ok(())
}
