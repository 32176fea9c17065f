//! Golden-dataset smoke run against the synthesis service.
//!
//! Posts each golden case to the service, saves the returned audio, and
//! records latency and a size sanity flag in `run_results.csv`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

/// Header of the run results table.
pub const RUN_RESULTS_HEADER: &str = "case_id,text,latency_sec,ok,file";

/// Run results file name, written into the output directory.
pub const RUN_RESULTS_FILE: &str = "run_results.csv";

/// Payloads at or below this size are treated as failed synthesis.
const MIN_AUDIO_BYTES: u64 = 1000;

/// One golden input case.
#[derive(Debug, Clone, Copy)]
pub struct GoldenCase {
    pub id: &'static str,
    pub text: &'static str,
}

/// Built-in golden dataset.
pub const GOLDEN_CASES: &[GoldenCase] = &[
    GoldenCase {
        id: "G1_short",
        text: "Hello world, this is a test.",
    },
    GoldenCase {
        id: "G2_numeric",
        text: "The total is $1,234.56 due by 10/12/2025 at 14:30.",
    },
    GoldenCase {
        id: "G3_multi",
        text: "Bienvenue à Paris. 次の駅は渋谷です. 123 ABC.",
    },
];

/// Outcome of one smoke case.
#[derive(Debug, Clone)]
pub struct SmokeResult {
    pub case_id: String,
    pub text: String,
    pub latency_sec: Option<f64>,
    pub ok: bool,
    pub file: Option<PathBuf>,
}

impl SmokeResult {
    fn failed(case: &GoldenCase) -> Self {
        Self {
            case_id: case.id.to_string(),
            text: case.text.to_string(),
            latency_sec: None,
            ok: false,
            file: None,
        }
    }
}

/// Errors that can occur for a single smoke case.
#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

async fn synthesize_case(
    client: &reqwest::Client,
    api_url: &str,
    out_dir: &Path,
    case: &GoldenCase,
    format: &str,
) -> Result<SmokeResult, SmokeError> {
    let started = Instant::now();
    let response = client
        .post(api_url)
        .json(&json!({ "text": case.text, "format": format }))
        .send()
        .await
        .map_err(|e| SmokeError::Request(e.to_string()))?;
    let latency = started.elapsed().as_secs_f64();

    if !response.status().is_success() {
        return Err(SmokeError::Request(format!("HTTP {}", response.status())));
    }

    let audio = response
        .bytes()
        .await
        .map_err(|e| SmokeError::Request(e.to_string()))?;

    let file = out_dir.join(format!("{}.{}", case.id, format));
    fs::write(&file, &audio)?;

    let ok = fs::metadata(&file)?.len() > MIN_AUDIO_BYTES;
    info!(
        "{}: {:.3}s saved={} file={}",
        case.id,
        latency,
        ok,
        file.display()
    );

    Ok(SmokeResult {
        case_id: case.id.to_string(),
        text: case.text.to_string(),
        latency_sec: Some(latency),
        ok,
        file: Some(file),
    })
}

/// Run the golden dataset against `api_url`, collecting one result per case
/// in dataset order.
///
/// A failed case is logged and recorded with `ok=false`; it never aborts
/// the run.
pub async fn run_smoke(
    api_url: &str,
    out_dir: &Path,
    format: &str,
) -> Result<Vec<SmokeResult>, SmokeError> {
    fs::create_dir_all(out_dir)?;
    let client = reqwest::Client::new();

    let mut results = Vec::with_capacity(GOLDEN_CASES.len());
    for case in GOLDEN_CASES {
        match synthesize_case(&client, api_url, out_dir, case, format).await {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("{}: {}", case.id, e);
                results.push(SmokeResult::failed(case));
            }
        }
    }

    Ok(results)
}

/// Write `run_results.csv` rows in result order.
pub fn write_run_results(results: &[SmokeResult], path: &Path) -> std::io::Result<()> {
    let mut lines = vec![RUN_RESULTS_HEADER.to_string()];
    for result in results {
        let latency = result
            .latency_sec
            .map(|l| l.to_string())
            .unwrap_or_default();
        let file = result
            .file
            .as_ref()
            .map(|f| f.display().to_string())
            .unwrap_or_default();
        lines.push(format!(
            "{},\"{}\",{},{},{}",
            result.case_id,
            result.text.replace('"', "\"\""),
            latency,
            result.ok,
            file
        ));
    }
    fs::write(path, lines.join("\n"))
}
