//! `mock-server`: local stand-in for the synthesis service.
//!
//! Serves the same `/synthesize` contract the speak and smoke clients
//! consume. By default every request gets a generated test tone; with
//! `MOCK_REAL_VOICE=1` the server relays the `speak` binary instead,
//! picking a voice from the request text's script.

use std::io::{Cursor, Read};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::Deserialize;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{error, info, warn};

use speechbench::audio;

/// Fallback voice when neither the request nor MOCK_VOICE names one.
const DEFAULT_VOICE: &str = "en-US-JennyNeural";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SynthesizePayload {
    text: String,
    voice: Option<String>,
    format: String,
}

impl Default for SynthesizePayload {
    fn default() -> Self {
        Self {
            text: "Hello from mock".to_string(),
            voice: None,
            format: "mp3".to_string(),
        }
    }
}

/// Picks a voice matching the script of the request text.
struct VoicePicker {
    japanese: Regex,
    french: Regex,
}

impl VoicePicker {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            japanese: Regex::new(r"[\x{3040}-\x{30FF}\x{31F0}-\x{31FF}\x{FF10}-\x{FF9F}]")?,
            french: Regex::new("[àâçéèêëîïôûùüÿœÀÂÇÉÈÊËÎÏÔÛÙÜŸŒ]")?,
        })
    }

    fn pick(&self, text: &str, fallback: &str) -> String {
        if self.japanese.is_match(text) {
            return "ja-JP-NanamiNeural".to_string();
        }
        if self.french.is_match(text) {
            return "fr-FR-DeniseNeural".to_string();
        }
        fallback.to_string()
    }
}

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes())
        .map_err(|_| anyhow!("Invalid header value: {value}"))
}

fn json_response(status: u16, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    Ok(Response::from_data(body.as_bytes().to_vec())
        .with_status_code(status)
        .with_header(content_type("application/json")?))
}

/// Relay a request through the real `speak` binary, capturing its stdout.
fn relay_speak(text: &str, voice: &str, format: &str) -> Result<Vec<u8>> {
    let output = Command::new("speak")
        .args(["--text", text, "--voice", voice, "--format", format])
        .output()
        .context("Failed to spawn speak")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("speak exited with {}: {}", output.status, stderr.trim());
    }

    Ok(output.stdout)
}

fn synthesize_response(
    request: &mut Request,
    picker: &VoicePicker,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;

    let payload: SynthesizePayload = if body.trim().is_empty() {
        SynthesizePayload::default()
    } else {
        serde_json::from_str(&body).context("Malformed request body")?
    };
    let format = payload.format.to_lowercase();

    let audio = if std::env::var("MOCK_REAL_VOICE").as_deref() == Ok("1") {
        let fallback = std::env::var("MOCK_VOICE").unwrap_or_else(|_| DEFAULT_VOICE.to_string());
        let voice = payload
            .voice
            .clone()
            .unwrap_or_else(|| picker.pick(&payload.text, &fallback));

        match relay_speak(&payload.text, &voice, &format) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("speak relay failed, serving test tone: {e}");
                audio::sine_wav_bytes(1.0, 440.0, 22_050)?
            }
        }
    } else {
        audio::sine_wav_bytes(1.0, 440.0, 22_050)?
    };

    let mime = if format == "mp3" {
        "audio/mpeg"
    } else {
        "audio/wav"
    };
    Ok(Response::from_data(audio).with_header(content_type(mime)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let picker = VoicePicker::new()?;

    let server =
        Server::http(("0.0.0.0", port)).map_err(|e| anyhow!("Failed to bind port {port}: {e}"))?;
    info!("Mock TTS listening on http://localhost:{port}");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = match (&method, url.as_str()) {
            (Method::Post, "/synthesize") => match synthesize_response(&mut request, &picker) {
                Ok(response) => response,
                Err(e) => {
                    error!("synthesize failed: {e}");
                    json_response(400, r#"{"error":"bad_request"}"#)?
                }
            },
            (Method::Get, "/health") => json_response(200, r#"{"ok":true}"#)?,
            _ => Response::from_data(Vec::new()).with_status_code(404),
        };

        if let Err(e) = request.respond(response) {
            warn!("Failed to send response: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_picker_japanese() {
        let picker = VoicePicker::new().unwrap();
        assert_eq!(
            picker.pick("次の駅は渋谷です", DEFAULT_VOICE),
            "ja-JP-NanamiNeural"
        );
    }

    #[test]
    fn test_voice_picker_french() {
        let picker = VoicePicker::new().unwrap();
        assert_eq!(
            picker.pick("Bienvenue à Paris", DEFAULT_VOICE),
            "fr-FR-DeniseNeural"
        );
    }

    #[test]
    fn test_voice_picker_fallback() {
        let picker = VoicePicker::new().unwrap();
        assert_eq!(picker.pick("123 ABC", DEFAULT_VOICE), DEFAULT_VOICE);
    }

    #[test]
    fn test_payload_defaults() {
        let payload: SynthesizePayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.text, "Hello from mock");
        assert_eq!(payload.format, "mp3");
        assert!(payload.voice.is_none());
    }

    #[test]
    fn test_payload_fields() {
        let payload: SynthesizePayload =
            serde_json::from_str(r#"{"text":"hi","format":"wav"}"#).unwrap();
        assert_eq!(payload.text, "hi");
        assert_eq!(payload.format, "wav");
    }
}
