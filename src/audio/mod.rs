//! Audio module - turns sound into descriptors
//!
//! This module provides:
//! - PCM buffer types handed over by a decoder
//! - Signal analysis (RMS, zero-crossing rate, seed, duration)
//! - Audio file decoding

mod analysis;
mod buffer;
mod file;

pub use analysis::{analyze, source_seed, try_analyze, AnalysisError, AudioMetrics, MAX_16BIT};
pub use buffer::{PcmBuffer, PcmFormat};
pub use file::{analyze_file, decode_file, is_wav_path, source_name, FileError};
