//! lightcraft - audio-driven geometry
//!
//! Analyzes a PCM buffer into a few coarse descriptors ([`AudioMetrics`])
//! and maps them onto an ordered sequence of colored 2-D points
//! ([`GeometryPoint`]).
//!
//! ```no_run
//! use lightcraft::{analyze_file, summarize, synthesize, DEFAULT_PREVIEW, DEFAULT_STEPS};
//!
//! let metrics = analyze_file("take.wav");
//! let points = synthesize(&metrics, DEFAULT_STEPS);
//! println!("{}", summarize(&points, DEFAULT_PREVIEW));
//! ```
//!
//! Both stages are pure and hold no shared state, so independent runs can
//! be spread across threads freely.

pub mod audio;
pub mod render;
pub mod settings;

pub use audio::{analyze, analyze_file, AudioMetrics, PcmBuffer, PcmFormat};
pub use render::{summarize, synthesize, GeometryPoint, Shape, DEFAULT_PREVIEW, DEFAULT_STEPS};
pub use settings::{OutputFormat, Settings};
