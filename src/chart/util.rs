//! Utility functions for rendering: default palettes, value scaling, number formatting.

/// Default five-color palette for line, bar and pie charts.
pub const DEFAULT_COLORS: [&str; 5] = ["#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6"];

/// Default heatmap ramp, from least to most intense.
pub const HEATMAP_COLORS: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

/// Fallback series palette when neither series colors nor a palette are configured.
pub const DEFAULT_SERIES_COLORS: [&str; 8] = [
    "#4285F4", // blue
    "#EA4335", // red
    "#FBBC05", // yellow
    "#34A853", // green
    "#8AB4F8", // light blue
    "#F6AEA9", // light red
    "#FDE293", // light yellow
    "#A8DAB5", // light green
];

/// Headroom added above the largest value on value axes.
pub const HEADROOM: f64 = 1.1;

/// Largest value in `values`, or 0 when empty or all negative.
pub fn max_value<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().copied().fold(0.0, f64::max)
}

/// Scale maximum for an axis: inflated by [`HEADROOM`], never zero.
pub fn axis_max(max: f64) -> f64 {
    let m = max * HEADROOM;
    if m > 0.0 && m.is_finite() { m } else { 1.0 }
}

/// Pixel length of `value` on an axis of `extent` pixels whose top is `max`.
///
/// Clamped to `[-extent, extent]` so values far outside the axis stay near the plot.
#[inline]
pub fn scale(value: f64, max: f64, extent: i64) -> i64 {
    let limit = extent.unsigned_abs() as f64;
    let px = value / max * extent as f64;
    if px.is_nan() {
        return 0;
    }
    px.clamp(-limit, limit) as i64
}

/// Sum values position-wise across series; the result is as long as the longest series.
pub fn stacked_totals<'a, I>(series: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut totals: Vec<f64> = Vec::new();
    for values in series {
        if values.len() > totals.len() {
            totals.resize(values.len(), 0.0);
        }
        for (t, v) in totals.iter_mut().zip(values) {
            *t += v;
        }
    }
    totals
}

/// Whole-number value label, as shown above bars.
pub fn fmt_whole(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_ignores_negatives_and_empty() {
        assert_eq!(max_value(&[]), 0.0);
        assert_eq!(max_value(&[-3.0, -1.0]), 0.0);
        assert_eq!(max_value(&[1.0, 7.5, 3.0]), 7.5);
    }

    #[test]
    fn scale_is_clamped_to_the_axis() {
        assert_eq!(scale(50.0, 100.0, 200), 100);
        assert_eq!(scale(-1e300, 1.1, 400), -400);
        assert_eq!(scale(1e300, 1.1, 400), 400);
        assert_eq!(scale(5.0, 1.0, -30), -30);
    }

    #[test]
    fn axis_max_has_headroom_and_floor() {
        assert!((axis_max(100.0) - 110.0).abs() < 1e-9);
        assert_eq!(axis_max(0.0), 1.0);
    }

    #[test]
    fn stacked_totals_handles_ragged_series() {
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 20.0];
        let totals = stacked_totals([&a[..], &b[..]]);
        assert_eq!(totals, vec![11.0, 22.0, 3.0]);
    }

    #[test]
    fn whole_number_labels() {
        assert_eq!(fmt_whole(150.0), "150");
        assert_eq!(fmt_whole(2.4), "2");
    }
}
