//! WAV decoding and resampling helpers.

use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use thiserror::Error;

/// Sample rate the recognizer expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Errors that can occur while decoding or generating audio.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Unsupported WAV layout: {0}")]
    Unsupported(String),
}

/// Decode a WAV file into mono f32 samples at 16 kHz.
///
/// Multi-channel input is averaged down to one channel; other sample rates
/// are resampled.
pub fn load_wav_mono_16k(path: &Path) -> Result<Vec<f32>, AudioError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(AudioError::Unsupported(format!(
                "{format:?} {bits}-bit samples"
            )));
        }
    };

    let mono = downmix(&samples, spec.channels as usize);

    if spec.sample_rate == WHISPER_SAMPLE_RATE {
        return Ok(mono);
    }
    resample(mono, spec.sample_rate, WHISPER_SAMPLE_RATE)
}

fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if samples.is_empty() {
        return Ok(samples);
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)
        .map_err(|e| AudioError::Resample(e.to_string()))?;
    let output = resampler
        .process(&[samples], None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    Ok(output.into_iter().next().unwrap_or_default())
}

/// Write a mono 16-bit PCM sine tone as a WAV stream.
pub fn write_sine_wav<W: Write + Seek>(
    writer: W,
    duration_secs: f64,
    freq: f64,
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut wav = WavWriter::new(writer, spec)?;
    let num_samples = (duration_secs * sample_rate as f64) as usize;
    for i in 0..num_samples {
        let t = i as f64 / sample_rate as f64;
        let sample = (2.0 * std::f64::consts::PI * freq * t).sin();
        wav.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f64) as i16)?;
    }
    wav.finalize()?;

    Ok(())
}

/// Generate a sine tone WAV in memory.
pub fn sine_wav_bytes(
    duration_secs: f64,
    freq: f64,
    sample_rate: u32,
) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    write_sine_wav(&mut cursor, duration_secs, freq, sample_rate)?;
    Ok(cursor.into_inner())
}
