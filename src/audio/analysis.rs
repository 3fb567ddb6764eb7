//! Signal analysis
//!
//! Reduces a 16-bit PCM buffer to a handful of coarse descriptors:
//! RMS loudness, zero-crossing rate, a seed derived from the source name,
//! and the duration.
//!
//! [`analyze`] never fails. Anything that goes wrong is reported through the
//! `log` facade and the all-zero [`AudioMetrics::default`] is returned, so
//! geometry synthesis always has something to work with. Use
//! [`try_analyze`] when the cause matters.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::buffer::PcmBuffer;

/// Largest positive 16-bit sample, used to normalize RMS
pub const MAX_16BIT: f64 = 32767.0;

/// The only sample width the analyzer understands
const SUPPORTED_SAMPLE_WIDTH: u16 = 2;

/// Errors that can occur while analyzing a buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Unsupported sample width ({0} bytes)")]
    UnsupportedSampleWidth(u16),

    #[error("Buffer reports zero channels")]
    NoChannels,

    #[error("Buffer contains no frames")]
    EmptyBuffer,

    #[error("Frame rate is zero")]
    ZeroFrameRate,

    #[error("Expected {expected} samples, buffer holds {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("Sample {index} ({value}) does not fit in 16 bits")]
    SampleOutOfRange { index: usize, value: i32 },
}

impl AnalysisError {
    /// Severity the failure is reported at
    pub fn severity(&self) -> log::Level {
        match self {
            Self::UnsupportedSampleWidth(_) => log::Level::Warn,
            _ => log::Level::Error,
        }
    }
}

/// Descriptors derived from one analysis run
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioMetrics {
    /// RMS amplitude over all channels, normalized by [`MAX_16BIT`]
    pub volume_rms: f64,
    /// Sign changes between consecutive samples per frame
    pub activity_rate: f64,
    /// Source name character sum modulo 10
    pub seed: u8,
    pub duration_seconds: f64,
}

impl AudioMetrics {
    /// True for the all-zero sentinel produced on failure.
    ///
    /// Real silence from an unnamed, empty-duration source is
    /// indistinguishable from it.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for AudioMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Analysis Results: {{volume_rms: {:.1}, activity_rate: {:.1}, seed: {}}}",
            self.volume_rms, self.activity_rate, self.seed
        )
    }
}

/// Analyze a buffer, degrading to the default metrics on any failure.
///
/// Failures are logged at [`AnalysisError::severity`].
pub fn analyze(buffer: &PcmBuffer, source_name: &str) -> AudioMetrics {
    match try_analyze(buffer, source_name) {
        Ok(metrics) => metrics,
        Err(e) => {
            log::log!(e.severity(), "{}", failure_message(&e, source_name));
            AudioMetrics::default()
        }
    }
}

/// Analyze a buffer, returning the failure cause instead of a default
pub fn try_analyze(buffer: &PcmBuffer, source_name: &str) -> Result<AudioMetrics, AnalysisError> {
    let format = &buffer.format;

    if format.sample_width_bytes != SUPPORTED_SAMPLE_WIDTH {
        return Err(AnalysisError::UnsupportedSampleWidth(format.sample_width_bytes));
    }
    if format.channel_count == 0 {
        return Err(AnalysisError::NoChannels);
    }
    if format.frame_count == 0 {
        return Err(AnalysisError::EmptyBuffer);
    }
    if format.frame_rate == 0 {
        return Err(AnalysisError::ZeroFrameRate);
    }

    let samples = unpack_samples(buffer)?;

    let volume_rms = rms(&samples) / MAX_16BIT;

    // Divisor is frames, not pooled samples: multichannel rates can exceed
    // a true per-frame fraction.
    let activity_rate = if format.frame_count > 1 {
        zero_crossings(&samples) as f64 / format.frame_count as f64
    } else {
        0.0
    };

    let metrics = AudioMetrics {
        volume_rms,
        activity_rate,
        seed: source_seed(source_name),
        duration_seconds: format.frame_count as f64 / format.frame_rate as f64,
    };

    log::debug!("Analyzed {}: {:?}", source_name, metrics);

    Ok(metrics)
}

/// Log line for a failed run; the record level carries the severity
fn failure_message(error: &AnalysisError, source_name: &str) -> String {
    match error.severity() {
        log::Level::Warn => format!("{} in {}", error, source_name),
        _ => format!("Error analyzing audio file {}: {}", source_name, error),
    }
}

/// Seed derived from the base name of `source_name`
pub fn source_seed(source_name: &str) -> u8 {
    let base = Path::new(source_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source_name);

    let sum: u64 = base.chars().map(|c| u64::from(c as u32)).sum();
    (sum % 10) as u8
}

/// Check the interleaved samples against the metadata and widen to `f64`
fn unpack_samples(buffer: &PcmBuffer) -> Result<Vec<f64>, AnalysisError> {
    let actual = buffer.samples.len() as u64;
    let expected = buffer.format.sample_count().unwrap_or(u64::MAX);
    if expected != actual {
        return Err(AnalysisError::LengthMismatch { expected, actual });
    }

    buffer
        .samples
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            i16::try_from(value)
                .map(f64::from)
                .map_err(|_| AnalysisError::SampleOutOfRange { index, value })
        })
        .collect()
}

fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Count strict sign changes between neighbours; zero counts as non-negative
fn zero_crossings(samples: &[f64]) -> u64 {
    samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count() as u64
}
