//! Decoded PCM sample buffers
//!
//! A [`PcmBuffer`] is the hand-off point between whatever decoded the audio
//! and the analyzer. Samples are stored as signed integers, interleaved by
//! channel (`L R L R ...` for stereo), together with the format metadata the
//! decoder reported.
//!
//! Construction never validates: the metadata is taken as-is so that the
//! analyzer can decide how to degrade when it does not match the samples.

use serde::{Deserialize, Serialize};

/// Format metadata accompanying a sample buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Number of interleaved channels
    pub channel_count: u16,
    /// Bytes per sample as stored in the source (2 for 16-bit PCM)
    pub sample_width_bytes: u16,
    /// Frames per second
    pub frame_rate: u32,
    /// Number of frames (one sample per channel each)
    pub frame_count: u64,
}

impl PcmFormat {
    /// Number of interleaved samples this format describes, or `None` if
    /// the metadata overflows `u64`
    pub fn sample_count(&self) -> Option<u64> {
        self.frame_count.checked_mul(u64::from(self.channel_count))
    }
}

/// Interleaved signed PCM samples plus their format
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<i32>,
    pub format: PcmFormat,
}

impl PcmBuffer {
    /// Wrap samples with explicit metadata
    pub fn new(samples: Vec<i32>, format: PcmFormat) -> Self {
        Self { samples, format }
    }

    /// Build a 16-bit buffer from interleaved `i16` samples.
    ///
    /// The frame count is derived from the sample count; a trailing partial
    /// frame is not counted.
    pub fn from_i16(samples: &[i16], channel_count: u16, frame_rate: u32) -> Self {
        let frame_count = if channel_count == 0 {
            0
        } else {
            (samples.len() / channel_count as usize) as u64
        };

        Self {
            samples: samples.iter().map(|&s| i32::from(s)).collect(),
            format: PcmFormat {
                channel_count,
                sample_width_bytes: 2,
                frame_rate,
                frame_count,
            },
        }
    }

    /// Duration implied by the metadata, or `None` when the frame rate is zero
    pub fn duration_seconds(&self) -> Option<f64> {
        if self.format.frame_rate == 0 {
            return None;
        }
        Some(self.format.frame_count as f64 / self.format.frame_rate as f64)
    }
}
