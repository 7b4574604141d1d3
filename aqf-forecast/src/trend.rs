//! Time scaling and changepoint helpers for the piecewise-linear trend.

use chrono::NaiveDate;

/// Days from `start` to `date`, as a float.
pub fn day_offset(start: NaiveDate, date: NaiveDate) -> f64 {
    (date - start).num_days() as f64
}

/// Offsets scaled so the history spans [0, 1].
pub fn time_scale(offsets: &[f64], span_days: f64) -> Vec<f64> {
    offsets
        .iter()
        .map(|d| if span_days > 0.0 { d / span_days } else { 0.0 })
        .collect()
}

/// Select up to `n` changepoints uniformly from the first `changepoint_range`
/// of the sorted, de-duplicated scaled times `t`. The first time is never a
/// changepoint.
pub fn select_changepoints(t: &[f64], n: usize, changepoint_range: f64) -> Vec<f64> {
    if t.len() <= 2 || n == 0 {
        return Vec::new();
    }
    let range = changepoint_range.clamp(0.0, 1.0);
    let hist_size = ((t.len() as f64) * range).floor() as usize;
    if hist_size <= 1 {
        return Vec::new();
    }
    let n = n.min(hist_size - 1);
    let step = (hist_size - 1) as f64 / n as f64;
    let mut cps: Vec<f64> = (1..=n)
        .map(|i| t[((i as f64 * step).round() as usize).min(hist_size - 1)])
        .collect();
    cps.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
    cps
}

/// Hinge features `max(t - s_j, 0)` for each changepoint `s_j`.
///
/// With these columns the trend `m + k*t + sum(delta_j * hinge_j)` is the
/// continuous piecewise-linear curve whose slope changes by `delta_j` at `s_j`.
pub fn changepoint_features(t: f64, changepoints: &[f64]) -> Vec<f64> {
    changepoints.iter().map(|s| (t - s).max(0.0)).collect()
}

/// Evaluate the piecewise-linear trend at `t`.
pub fn piecewise_linear(k: f64, m: f64, deltas: &[f64], changepoints: &[f64], t: f64) -> f64 {
    let hinge: f64 = changepoint_features(t, changepoints)
        .iter()
        .zip(deltas)
        .map(|(h, d)| h * d)
        .sum();
    m + k * t + hinge
}
