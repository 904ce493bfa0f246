//! Charts for the analysis report.
//!
//! - `ascii`: fixed-size character grids printed to the terminal
//! - `svg`: Plotters charts written to files

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

/// Pad a value range by `frac` of its span on each side. Degenerate ranges
/// are widened to one unit so they can still be mapped.
pub(crate) fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    if span < 1e-12 {
        return (min - 0.5, max + 0.5);
    }
    let pad = span * frac;
    (min - pad, max + pad)
}

/// Min/max over finite values, `None` when there are none.
pub(crate) fn finite_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}
