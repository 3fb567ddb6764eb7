//! Plain-text summary of a synthesized run

use std::fmt::Write;

use super::geometry::GeometryPoint;

/// Points shown at each end of the summary by default
pub const DEFAULT_PREVIEW: usize = 5;

/// Render a short console summary of `points`.
///
/// The first `preview` points are always listed. When the run is longer
/// than twice that, the last `preview` points follow after an ellipsis.
/// Point numbers are 1-based step indices.
pub fn summarize(points: &[GeometryPoint], preview: usize) -> String {
    let mut out = String::new();

    out.push_str("--- Visualization Data Summary ---\n");
    let _ = writeln!(out, "Total Points: {}", points.len());
    let _ = writeln!(out, "First {} Points:", preview);

    for (i, point) in points.iter().enumerate().take(preview) {
        push_point(&mut out, i + 1, point);
    }

    if points.len() > preview * 2 {
        out.push_str("...\n");
        let _ = writeln!(out, "Last {} Points:", preview);
        let start = points.len() - preview;
        for (i, point) in points.iter().enumerate().skip(start) {
            push_point(&mut out, i + 1, point);
        }
    }

    out
}

fn push_point(out: &mut String, index: usize, p: &GeometryPoint) {
    let _ = writeln!(
        out,
        "  [{}] {} @ ({:.2}, {:.2}) HSL({:.0}, {:.0}%)",
        index, p.shape, p.x, p.y, p.hue, p.lightness
    );
}
