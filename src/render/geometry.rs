//! Geometry synthesis
//!
//! Maps one [`AudioMetrics`] record onto an ordered run of 2-D points.
//! The index of a point is its position on the animation axis, so the
//! returned order must be kept by whoever draws it.
//!
//! A run uses a single [`Shape`]: busy audio (activity above
//! [`HEXAGON_ACTIVITY_THRESHOLD`]) walks a damped hexagonal lattice, calm
//! audio grows a golden-angle spiral.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::AudioMetrics;

/// Number of points generated when the caller has no preference
pub const DEFAULT_STEPS: usize = 200;

/// Activity rate above which the hexagon branch is taken
pub const HEXAGON_ACTIVITY_THRESHOLD: f64 = 0.1;

/// Golden angle in degrees
const GOLDEN_ANGLE_DEG: f64 = 137.5;

/// Point family a run is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    Spiral,
    Hexagon,
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spiral => "SPIRAL",
            Self::Hexagon => "HEXAGON",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One point of a synthesized run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryPoint {
    pub x: f64,
    pub y: f64,
    /// Degrees, in `[0, 360)`
    pub hue: f64,
    /// Percent
    pub lightness: f64,
    pub shape: Shape,
}

/// Run-level parameters derived from the metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    pub spiral_scale: f64,
    pub hex_amplitude: f64,
    pub base_hue: f64,
    pub lightness: f64,
    pub shape: Shape,
}

impl GeometryParams {
    pub fn from_metrics(metrics: &AudioMetrics) -> Self {
        let shape = if metrics.activity_rate > HEXAGON_ACTIVITY_THRESHOLD {
            Shape::Hexagon
        } else {
            Shape::Spiral
        };

        Self {
            spiral_scale: 50.0 + metrics.volume_rms * 150.0,
            hex_amplitude: 1.0 + metrics.activity_rate * 2.0,
            base_hue: f64::from((u32::from(metrics.seed) * 36) % 360),
            lightness: round2(70.0 + metrics.volume_rms * 30.0),
            shape,
        }
    }

    /// Point `step` of the run (steps start at 1)
    pub fn point(&self, step: usize) -> GeometryPoint {
        let (x, y) = match self.shape {
            Shape::Hexagon => hexagon_point(step, self.spiral_scale / 3.0, self.hex_amplitude),
            Shape::Spiral => golden_spiral_point(step, self.spiral_scale),
        };

        GeometryPoint {
            x,
            y,
            hue: wrap_hue(self.base_hue + x * y * 0.01),
            lightness: self.lightness,
            shape: self.shape,
        }
    }
}

/// Generate `num_steps` points for the given metrics, in step order.
///
/// Zero steps yields an empty run.
pub fn synthesize(metrics: &AudioMetrics, num_steps: usize) -> Vec<GeometryPoint> {
    let params = GeometryParams::from_metrics(metrics);
    log::debug!(
        "Synthesizing {} {} points (scale {:.2}, base hue {})",
        num_steps,
        params.shape,
        params.spiral_scale,
        params.base_hue
    );

    (1..=num_steps).map(|step| params.point(step)).collect()
}

/// Golden-angle spiral: radius grows with `sqrt(t)`
pub fn golden_spiral_point(t: usize, scale: f64) -> (f64, f64) {
    let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
    let t = t as f64;
    let r = scale * t.sqrt() * (1.0 / phi);
    let angle = t * GOLDEN_ANGLE_DEG.to_radians();
    (r * angle.cos(), r * angle.sin())
}

/// Hexagonal lattice: 30 degree steps with a slow sinusoidal radial damping
pub fn hexagon_point(t: usize, radius: f64, amplitude: f64) -> (f64, f64) {
    let t = t as f64;
    let z = ((t * 0.1).sin() * 0.5 + 0.5) * amplitude;
    let angle = t * (PI / 6.0);
    (radius * angle.cos() * z, radius * angle.sin() * z)
}

/// Round to 2 decimals on the exact binary value, not on `value * 100`
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

fn wrap_hue(raw: f64) -> f64 {
    let hue = round2(raw.rem_euclid(360.0));
    if hue >= 360.0 {
        0.0
    } else {
        hue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(volume_rms: f64, activity_rate: f64, seed: u8) -> AudioMetrics {
        AudioMetrics {
            volume_rms,
            activity_rate,
            seed,
            duration_seconds: 1.0,
        }
    }

    #[test]
    fn test_zero_steps() {
        assert!(synthesize(&metrics(0.5, 0.5, 1), 0).is_empty());
    }

    #[test]
    fn test_silent_spiral() {
        let points = synthesize(&metrics(0.0, 0.0, 0), DEFAULT_STEPS);
        assert_eq!(points.len(), 200);
        assert!(points.iter().all(|p| p.shape == Shape::Spiral));

        // First point: r = 50 / phi, angle = 137.5 degrees
        let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
        let r = 50.0 / phi;
        let angle = 137.5f64.to_radians();
        assert!((points[0].x - r * angle.cos()).abs() < 1e-9);
        assert!((points[0].y - r * angle.sin()).abs() < 1e-9);
        assert_eq!(points[0].lightness, 70.0);
    }

    #[test]
    fn test_busy_hexagon() {
        let m = metrics(1.0, 0.99, 4);
        let points = synthesize(&m, 50);
        assert_eq!(points.len(), 50);
        assert!(points.iter().all(|p| p.shape == Shape::Hexagon));

        let params = GeometryParams::from_metrics(&m);
        assert_eq!(params.spiral_scale, 200.0);
        assert!((params.hex_amplitude - 2.98).abs() < 1e-12);
        assert_eq!(params.base_hue, 144.0);

        let (x, y) = hexagon_point(1, 200.0 / 3.0, params.hex_amplitude);
        assert_eq!((points[0].x, points[0].y), (x, y));
        assert_eq!(points[0].lightness, 100.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let at = synthesize(&metrics(0.2, HEXAGON_ACTIVITY_THRESHOLD, 0), 5);
        assert!(at.iter().all(|p| p.shape == Shape::Spiral));

        let above = synthesize(&metrics(0.2, 0.1000001, 0), 5);
        assert!(above.iter().all(|p| p.shape == Shape::Hexagon));
    }

    #[test]
    fn test_hexagon_lattice_angles() {
        // Step 6 lands on the negative x axis
        let (x, y) = hexagon_point(6, 10.0, 1.0);
        assert!(x < 0.0);
        assert!(y.abs() < 1e-9);

        // Step 12 wraps back to the positive x axis
        let (x, y) = hexagon_point(12, 10.0, 1.0);
        assert!(x > 0.0);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_color_ranges() {
        for seed in 0..10 {
            for &(vol, act) in &[(0.0, 0.0), (0.3, 0.05), (1.0, 0.2), (0.7, 1.0)] {
                for p in synthesize(&metrics(vol, act, seed), 300) {
                    assert!(p.hue >= 0.0 && p.hue < 360.0, "hue {}", p.hue);
                    assert!(p.lightness >= 70.0 && p.lightness <= 100.0);
                }
            }
        }
    }

    #[test]
    fn test_hue_rounding() {
        assert_eq!(wrap_hue(12.345678), 12.35);
        assert_eq!(wrap_hue(-10.0), 350.0);
        assert_eq!(wrap_hue(359.999), 0.0);
        assert_eq!(wrap_hue(720.5), 0.5);
        // 10.205 is stored just above the tie
        assert_eq!(wrap_hue(10.205), 10.21);
    }

    #[test]
    fn test_lightness_rounding() {
        let params = GeometryParams::from_metrics(&metrics(0.123456, 0.0, 0));
        assert_eq!(params.lightness, 73.7);

        // 70.675 is stored just below the tie
        let params = GeometryParams::from_metrics(&metrics(0.0225, 0.0, 0));
        assert_eq!(params.lightness, 70.67);
    }

    #[test]
    fn test_repeatable() {
        let m = metrics(0.42, 0.3, 7);
        assert_eq!(synthesize(&m, 120), synthesize(&m, 120));
    }

    #[test]
    fn test_prefix_stable() {
        // Step count only changes how far the run goes
        let m = metrics(0.42, 0.05, 2);
        let short = synthesize(&m, 10);
        let long = synthesize(&m, 100);
        assert_eq!(short[..], long[..10]);
    }

    #[test]
    fn test_shape_serialization() {
        assert_eq!(serde_json::to_string(&Shape::Spiral).unwrap(), "\"SPIRAL\"");
        assert_eq!(Shape::Hexagon.to_string(), "HEXAGON");
    }
}
