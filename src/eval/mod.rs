//! Batch WER/CER evaluation over a synthesis results table.
//!
//! Reads the run results CSV, transcribes every eligible row's audio file,
//! scores the hypothesis against the reference text, and writes
//! `wer_results.csv` next to the input.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::asr::{AsrError, Transcriber};
use crate::metrics::{cer, normalize_text, wer};

/// Header of the output table.
pub const RESULTS_HEADER: &str = "case_id,input_text,asr_text,wer,cer,file";

/// Output file name, written into the input CSV's directory.
pub const RESULTS_FILE: &str = "wer_results.csv";

/// Errors that can occur during a batch evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcription error: {0}")]
    Asr(#[from] AsrError),
}

/// One row of the input table.
///
/// Unknown columns are ignored; missing fields read as empty strings, which
/// makes the row ineligible rather than an error.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub case_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub ok: String,
}

impl TestCase {
    /// A row is eligible when its `ok` flag equals "true",
    /// case-insensitively.
    pub fn is_eligible(&self) -> bool {
        self.ok.eq_ignore_ascii_case("true")
    }
}

/// One evaluated row of the output table.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalRecord {
    pub case_id: String,
    pub input_text: String,
    pub asr_text: String,
    pub wer: f64,
    pub cer: f64,
    pub file: String,
}

impl EvalRecord {
    /// Render as an output CSV line: text columns quoted with embedded
    /// quotes doubled, rates to four decimal places.
    fn to_csv_line(&self) -> String {
        format!(
            "{},\"{}\",\"{}\",{:.4},{:.4},{}",
            self.case_id,
            escape_quotes(&self.input_text),
            escape_quotes(&self.asr_text),
            self.wer,
            self.cer,
            self.file
        )
    }
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\"\"")
}

/// Transcribe one case and score it against its reference text.
pub fn evaluate_case<T: Transcriber>(
    case: &TestCase,
    transcriber: &mut T,
) -> Result<EvalRecord, EvalError> {
    let reference = normalize_text(&case.text);
    let hypothesis = transcriber.transcribe(Path::new(&case.file))?;

    let word_error = wer(&reference, &hypothesis);
    let char_error = cer(&reference, &hypothesis);

    Ok(EvalRecord {
        case_id: case.case_id.clone(),
        input_text: reference,
        asr_text: hypothesis,
        wer: word_error,
        cer: char_error,
        file: case.file.clone(),
    })
}

/// Evaluate every eligible row of `csv_path` with `transcriber`.
///
/// Writes `wer_results.csv` into the input file's directory and returns its
/// path. Rows whose `ok` flag is not "true", or whose audio file is missing,
/// are skipped without diagnostics; any transcription error aborts the
/// remaining batch.
pub fn run_eval<T: Transcriber>(
    csv_path: &Path,
    transcriber: &mut T,
) -> Result<PathBuf, EvalError> {
    let out_dir = csv_path.parent().unwrap_or_else(|| Path::new("."));

    let mut reader = csv::Reader::from_path(csv_path)?;
    let cases: Vec<TestCase> = reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(TestCase::is_eligible)
        .collect();
    info!("{} eligible rows in {}", cases.len(), csv_path.display());

    let mut lines = vec![RESULTS_HEADER.to_string()];
    for case in &cases {
        if case.file.is_empty() || !Path::new(&case.file).exists() {
            debug!("Skipping {}: audio file missing", case.case_id);
            continue;
        }

        let record = evaluate_case(case, transcriber)?;
        info!(
            "{}: wer={:.4} cer={:.4}",
            record.case_id, record.wer, record.cer
        );
        lines.push(record.to_csv_line());
    }

    let out_csv = out_dir.join(RESULTS_FILE);
    fs::write(&out_csv, lines.join("\n"))?;
    Ok(out_csv)
}
