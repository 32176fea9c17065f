//! HTML quality report over smoke and evaluation results.
//!
//! Joins `run_results.csv` with `wer_results.csv` (when present) and renders
//! a card per case with status, latency, and error-rate badges.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::eval::RESULTS_FILE;
use crate::smoke::RUN_RESULTS_FILE;

/// Report file name, written into the results directory.
pub const REPORT_FILE: &str = "report.html";

/// Errors that can occur while rendering the report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV not found at {0}. Run the smoke binary first.")]
    MissingRunResults(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// WER/CER pair for one case.
#[derive(Debug, Clone, Copy)]
struct WerEntry {
    wer: f64,
    cer: f64,
}

/// Read a CSV into header-keyed records.
fn read_records(path: &Path) -> Result<Vec<HashMap<String, String>>, ReportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.trim().to_string(), v.trim().to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn field<'a>(record: &'a HashMap<String, String>, name: &str) -> &'a str {
    record.get(name).map(String::as_str).unwrap_or("")
}

/// A pill-shaped status badge.
fn badge(color: &str, text: &str) -> String {
    format!(
        "<span style=\"display:inline-block;padding:4px 8px;border-radius:999px;\
         background:{color};color:white;font-size:12px;\">{text}</span>"
    )
}

fn latency_badge(latency: Option<f64>) -> String {
    match latency {
        None => badge("#9CA3AF", "n/a"),
        Some(l) => {
            let color = if l <= 1.0 {
                "#10B981"
            } else if l <= 2.0 {
                "#F59E0B"
            } else {
                "#EF4444"
            };
            badge(color, &format!("{l:.3}s"))
        }
    }
}

fn wer_badge(wer: f64) -> String {
    let color = if wer <= 0.15 {
        "#10B981"
    } else if wer <= 0.25 {
        "#F59E0B"
    } else {
        "#EF4444"
    };
    badge(color, &format!("WER {:.1}%", wer * 100.0))
}

fn cer_badge(cer: f64) -> String {
    let color = if cer <= 0.10 {
        "#10B981"
    } else if cer <= 0.20 {
        "#F59E0B"
    } else {
        "#EF4444"
    };
    badge(color, &format!("CER {:.1}%", cer * 100.0))
}

/// Rewrite an audio path so it resolves relative to the report file.
fn relative_media_path(file: &str, dir: &Path) -> String {
    let norm = file.replace('\\', "/");
    let dir_name = dir.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if dir_name.is_empty() {
        return norm;
    }

    let marker = format!("/{dir_name}/");
    if let Some(idx) = norm.find(&marker) {
        return norm[idx + marker.len()..].to_string();
    }
    let prefix = format!("{dir_name}/");
    if let Some(rest) = norm.strip_prefix(&prefix) {
        return rest.to_string();
    }
    norm
}

fn render_card(
    run: &HashMap<String, String>,
    wer_map: &HashMap<String, WerEntry>,
    dir: &Path,
) -> String {
    let case_id = field(run, "case_id");
    let ok = field(run, "ok").eq_ignore_ascii_case("true");
    let latency = field(run, "latency_sec").parse::<f64>().ok();

    let mut chips = vec![
        badge(if ok { "#2563EB" } else { "#EF4444" }, if ok { "OK" } else { "FAIL" }),
        latency_badge(latency),
    ];
    if let Some(entry) = wer_map.get(case_id) {
        chips.push(wer_badge(entry.wer));
        chips.push(cer_badge(entry.cer));
    }
    let chips = chips.join("\n              ");

    let media = relative_media_path(field(run, "file"), dir);
    let player = if ok && !media.is_empty() {
        format!("<audio controls preload=\"none\" src=\"{media}\" style=\"width:100%\"></audio>")
    } else {
        String::new()
    };

    format!(
        r#"      <div class="card">
        <div class="card-header">
          <div class="left">
            <h3>{case_id}</h3>
            <div class="chips">
              {chips}
            </div>
          </div>
        </div>
        <div class="row"><span class="label">Input</span><span class="value">{text}</span></div>
        <div class="row"><span class="label">File</span><span class="value">{file}</span></div>
        <div class="player">{player}</div>
      </div>"#,
        text = field(run, "text"),
        file = field(run, "file"),
    )
}

const STYLE: &str = r#"    :root {
      --bg:#0b1220; --bg2:#0d182b;
      --card: rgba(255,255,255,0.06); --border: rgba(255,255,255,0.12);
      --muted:#9CA3AF; --text:#F3F4F6; --heading:#FFFFFF;
    }
    *{ box-sizing:border-box }
    body{ margin:0; font-family:Inter,system-ui,Segoe UI,Arial; color:var(--text);
      background: linear-gradient(180deg, var(--bg), var(--bg2)); }
    .hero{ position:sticky; top:0; z-index:10; border-bottom:1px solid var(--border);
      background: linear-gradient(90deg, rgba(110,231,249,0.08), rgba(167,139,250,0.08)); }
    .hero-inner{ max-width:1200px; margin:0 auto; padding:14px 20px; display:flex; align-items:center; justify-content:space-between; }
    .title{ font-weight:700; letter-spacing:.2px; color:var(--heading); }
    .meta{ color:var(--muted); font-size:12px; }
    .wrap{ max-width:1200px; margin:26px auto; padding:0 20px; }
    .kpis{ display:flex; gap:12px; flex-wrap:wrap; }
    .grid{ display:grid; grid-template-columns:repeat(auto-fill,minmax(340px,1fr)); gap:18px; }
    .card{ background:var(--card); border:1px solid var(--border); border-radius:16px; padding:16px; overflow:hidden; }
    .card-header{ display:flex; align-items:center; justify-content:space-between; margin-bottom:10px; }
    .left{ display:flex; align-items:center; gap:12px; }
    h3{ margin:0; font-size:18px; color:#fff }
    .chips{ display:flex; gap:8px; flex-wrap:wrap; }
    .row{ display:grid; grid-template-columns:84px 1fr; gap:10px; margin:8px 0; align-items:flex-start; }
    .label{ color:var(--muted); font-size:11px; text-transform:uppercase; letter-spacing:.12em; }
    .value{ word-break:break-word; color:#e5e7eb }
    .player{ margin-top:12px; }
    audio{ width:100%; border-radius:10px; background:#0b1220 }
    .footer{ color:var(--muted); margin:24px 0 40px; font-size:12px; text-align:center }"#;

/// Render `report.html` into `dir` from its result CSVs.
///
/// `run_results.csv` is required; `wer_results.csv` is joined in when
/// present. Returns the report path.
pub fn render_report(dir: &Path) -> Result<PathBuf, ReportError> {
    let run_csv = dir.join(RUN_RESULTS_FILE);
    if !run_csv.exists() {
        return Err(ReportError::MissingRunResults(run_csv));
    }
    let runs = read_records(&run_csv)?;

    let wer_csv = dir.join(RESULTS_FILE);
    let have_wer = wer_csv.exists();
    let wer_map: HashMap<String, WerEntry> = if have_wer {
        read_records(&wer_csv)?
            .into_iter()
            .filter_map(|record| {
                let id = field(&record, "case_id").to_string();
                if id.is_empty() {
                    return None;
                }
                let wer = field(&record, "wer").parse().ok()?;
                let cer = field(&record, "cer").parse().ok()?;
                Some((id, WerEntry { wer, cer }))
            })
            .collect()
    } else {
        HashMap::new()
    };

    let cards: Vec<String> = runs
        .iter()
        .map(|run| render_card(run, &wer_map, dir))
        .collect();
    let cards = cards.join("\n");

    let cases_kpi = badge("#2563EB", &format!("Cases {}", runs.len()));
    let wer_kpi = if have_wer {
        badge("#A78BFA", "WER included")
    } else {
        badge("#6B7280", "WER not computed")
    };
    let footer_note = if have_wer {
        "Includes ASR WER/CER badges."
    } else {
        "Run wer-eval to include ASR badges."
    };
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    let html = format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>TTS Quality Report</title>
  <style>
{STYLE}
  </style>
</head>
<body>
  <header class="hero">
    <div class="hero-inner">
      <div>
        <div class="title">TTS Quality Report</div>
        <div class="meta">Golden dataset &bull; {generated}</div>
      </div>
      <div class="kpis">
        {cases_kpi}
        {wer_kpi}
      </div>
    </div>
  </header>
  <main class="wrap">
    <div class="grid">
{cards}
    </div>
    <div class="footer">Audio paths are relative to this HTML. {footer_note}</div>
  </main>
</body>
</html>
"#
    );

    let out = dir.join(REPORT_FILE);
    fs::write(&out, html)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_run_csv(dir: &TempDir) {
        fs::write(
            dir.path().join(RUN_RESULTS_FILE),
            "case_id,text,latency_sec,ok,file\n\
             G1_short,\"Hello world, this is a test.\",0.5,true,outputs/G1_short.mp3\n\
             G2_numeric,\"The total is $1,234.56\",2.5,false,",
        )
        .unwrap();
    }

    #[test]
    fn test_missing_run_results_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = render_report(dir.path());
        assert!(matches!(
            result.unwrap_err(),
            ReportError::MissingRunResults(_)
        ));
    }

    #[test]
    fn test_render_without_wer_csv() {
        let dir = TempDir::new().unwrap();
        write_run_csv(&dir);

        let out = render_report(dir.path()).unwrap();
        let html = fs::read_to_string(out).unwrap();

        assert!(html.contains("G1_short"));
        assert!(html.contains("G2_numeric"));
        assert!(html.contains("WER not computed"));
        assert!(!html.contains("WER 0.0%"));
    }

    #[test]
    fn test_render_joins_wer_results() {
        let dir = TempDir::new().unwrap();
        write_run_csv(&dir);
        fs::write(
            dir.path().join(RESULTS_FILE),
            "case_id,input_text,asr_text,wer,cer,file\n\
             G1_short,\"Hello world, this is a test.\",\"hello world this is a test\",0.1000,0.0500,outputs/G1_short.mp3",
        )
        .unwrap();

        let out = render_report(dir.path()).unwrap();
        let html = fs::read_to_string(out).unwrap();

        assert!(html.contains("WER included"));
        assert!(html.contains("WER 10.0%"));
        assert!(html.contains("CER 5.0%"));
    }

    #[test]
    fn test_latency_badge_thresholds() {
        assert!(latency_badge(Some(0.5)).contains("#10B981"));
        assert!(latency_badge(Some(1.5)).contains("#F59E0B"));
        assert!(latency_badge(Some(2.5)).contains("#EF4444"));
        assert!(latency_badge(None).contains("n/a"));
    }

    #[test]
    fn test_error_rate_badge_thresholds() {
        assert!(wer_badge(0.10).contains("#10B981"));
        assert!(wer_badge(0.20).contains("#F59E0B"));
        assert!(wer_badge(0.30).contains("#EF4444"));
        assert!(cer_badge(0.05).contains("#10B981"));
        assert!(cer_badge(0.15).contains("#F59E0B"));
        assert!(cer_badge(0.25).contains("#EF4444"));
    }

    #[test]
    fn test_relative_media_path() {
        let dir = Path::new("outputs");
        assert_eq!(
            relative_media_path("outputs/G1_short.mp3", dir),
            "G1_short.mp3"
        );
        assert_eq!(
            relative_media_path("C:\\work\\outputs\\G1_short.mp3", dir),
            "G1_short.mp3"
        );
        assert_eq!(
            relative_media_path("elsewhere/G1_short.mp3", dir),
            "elsewhere/G1_short.mp3"
        );
    }

    #[test]
    fn test_failed_case_has_no_player() {
        let dir = TempDir::new().unwrap();
        write_run_csv(&dir);

        let out = render_report(dir.path()).unwrap();
        let html = fs::read_to_string(out).unwrap();

        // Exactly one audio element: the OK row.
        assert_eq!(html.matches("<audio").count(), 1);
    }
}
