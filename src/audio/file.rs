//! Audio file decoding
//!
//! This module turns audio files into [`PcmBuffer`]s using symphonia, and
//! wires the decoder in front of the analyzer for file-based callers.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use super::analysis::{analyze, AudioMetrics};
use super::buffer::{PcmBuffer, PcmFormat};

/// Errors that can occur while decoding an audio file
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to probe audio format: {0}")]
    ProbeError(String),

    #[error("No audio tracks found")]
    NoTracks,

    #[error("Unsupported sample format")]
    UnsupportedSampleFormat,

    #[error("Decoder error: {0}")]
    DecoderError(String),
}

/// Case-insensitive check for a `.wav` extension
pub fn is_wav_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Base name of a path, used as the analyzer's source identifier
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

/// Decode and analyze a WAV file, degrading to the default metrics on failure.
///
/// Paths without a `.wav` extension are rejected before decoding, even if
/// symphonia could read them. Failures are logged at error level with their
/// cause.
pub fn analyze_file(path: impl AsRef<Path>) -> AudioMetrics {
    let path = path.as_ref();
    let name = source_name(path);

    if !is_wav_path(path) {
        log::error!("Error analyzing audio file {}: not a WAV file", name);
        return AudioMetrics::default();
    }

    match decode_file(path) {
        Ok(buffer) => analyze(&buffer, &name),
        Err(e) => {
            log::error!("Error analyzing audio file {}: {}", name, e);
            AudioMetrics::default()
        }
    }
}

/// Decode an entire audio file into interleaved integer samples
pub fn decode_file(path: impl AsRef<Path>) -> Result<PcmBuffer, FileError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    // Create media source stream
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create hint from file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    // Probe the file
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FileError::ProbeError(e.to_string()))?;

    let mut format = probed.format;

    // Get the default track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(FileError::NoTracks)?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| FileError::DecoderError(e.to_string()))?;

    let mut samples: Vec<i32> = Vec::new();
    let mut frame_count: u64 = 0;
    let mut channel_count = codec_params.channels.map(|c| c.count() as u16);
    let mut decoded_width = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(FileError::DecoderError(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let width = interleave_samples(&decoded, &mut samples)?;
                decoded_width.get_or_insert(width);
                channel_count.get_or_insert(decoded.spec().channels.count() as u16);
                frame_count += decoded.frames() as u64;
            }
            // Corrupt packets are skipped, matching symphonia's guidance
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(FileError::DecoderError(e.to_string())),
        }
    }

    // Prefer the container's declared width so 8-bit and 24-bit files keep
    // reporting what they are
    let sample_width_bytes = codec_params
        .bits_per_sample
        .map(|bits| bits.div_ceil(8) as u16)
        .or(decoded_width)
        .unwrap_or(0);

    let format = PcmFormat {
        channel_count: channel_count.unwrap_or(0),
        sample_width_bytes,
        frame_rate: codec_params.sample_rate.unwrap_or(0),
        frame_count,
    };

    log::info!(
        "Decoded {:?}: {} frames, {} ch, {} Hz, {} bytes/sample",
        path,
        format.frame_count,
        format.channel_count,
        format.frame_rate,
        format.sample_width_bytes
    );

    Ok(PcmBuffer::new(samples, format))
}

/// Append the decoded buffer to `out` in interleaved order.
///
/// Returns the sample width, in bytes, of the decoded representation.
fn interleave_samples(buffer: &AudioBufferRef<'_>, out: &mut Vec<i32>) -> Result<u16, FileError> {
    match buffer {
        AudioBufferRef::U8(buf) => {
            let channels = buf.spec().channels.count();
            push_interleaved(channels, buf.frames(), |ch, i| i32::from(buf.chan(ch)[i]) - 128, out);
            Ok(1)
        }
        AudioBufferRef::S16(buf) => {
            let channels = buf.spec().channels.count();
            push_interleaved(channels, buf.frames(), |ch, i| i32::from(buf.chan(ch)[i]), out);
            Ok(2)
        }
        AudioBufferRef::S24(buf) => {
            let channels = buf.spec().channels.count();
            push_interleaved(channels, buf.frames(), |ch, i| buf.chan(ch)[i].inner(), out);
            Ok(3)
        }
        AudioBufferRef::S32(buf) => {
            let channels = buf.spec().channels.count();
            push_interleaved(channels, buf.frames(), |ch, i| buf.chan(ch)[i], out);
            Ok(4)
        }
        _ => Err(FileError::UnsupportedSampleFormat),
    }
}

fn push_interleaved(
    channels: usize,
    frames: usize,
    sample: impl Fn(usize, usize) -> i32,
    out: &mut Vec<i32>,
) {
    out.reserve(channels * frames);
    for frame in 0..frames {
        for ch in 0..channels {
            out.push(sample(ch, frame));
        }
    }
}
