//! Min-max scaling for display.
//!
//! Each plotted series is rescaled independently onto a shared display range so
//! series with very different units (case counts vs. rates vs. index levels)
//! can share one chart.

/// Rescale `values` onto `[lo, hi]`, leaving `None` entries as gaps.
///
/// A constant series maps every present value to `lo`.
pub fn min_max_scale(values: &[Option<f64>], lo: f64, hi: f64) -> Vec<Option<f64>> {
    let (min, max) = values
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), &v| {
            (mn.min(v), mx.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return vec![None; values.len()];
    }

    let span = max - min;
    values
        .iter()
        .map(|v| {
            let v = (*v).filter(|v| v.is_finite())?;
            if span <= 0.0 {
                Some(lo)
            } else {
                Some(lo + (v - min) / span * (hi - lo))
            }
        })
        .collect()
}
