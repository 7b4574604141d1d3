//! In-sample accuracy of a fitted forecast.

use crate::adapter::Forecast;
use aqf_data::ObservationSeries;
use aqf_utils::stats::finite_or_default;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AccuracyMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    #[serde(rename = "r2_score")]
    pub r2: f64,
    pub mape: f64,
    pub accuracy_percentage: f64,
}

/// Score `(actual, fitted)` pairs.
///
/// MAPE skips pairs whose actual value is exactly zero (the term is
/// undefined) and averages over the rest; with no usable pair it is 0.
/// R² of a constant actual series is 1 for a perfect fit and 0 otherwise.
/// Every metric is finite; a non-finite result is reported as 0.
pub fn evaluate(pairs: &[(f64, f64)]) -> AccuracyMetrics {
    if pairs.is_empty() {
        log::warn!("No fitted values matched the history; reporting zero metrics");
        return AccuracyMetrics::default();
    }
    let n = pairs.len() as f64;

    let mae = pairs.iter().map(|(a, f)| (a - f).abs()).sum::<f64>() / n;
    let mse = pairs.iter().map(|(a, f)| (a - f).powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let mean_actual = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let ss_res = pairs.iter().map(|(a, f)| (a - f).powi(2)).sum::<f64>();
    let ss_tot = pairs
        .iter()
        .map(|(a, _)| (a - mean_actual).powi(2))
        .sum::<f64>();
    let r2 = if ss_res == 0.0 {
        1.0
    } else if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    let usable: Vec<f64> = pairs
        .iter()
        .filter(|(a, _)| *a != 0.0)
        .map(|(a, f)| ((a - f) / a).abs())
        .collect();
    let skipped = pairs.len() - usable.len();
    if skipped > 0 {
        log::warn!("MAPE skipped {} observation(s) with an actual value of 0", skipped);
    }
    let mape = if usable.is_empty() {
        0.0
    } else {
        usable.iter().sum::<f64>() / usable.len() as f64 * 100.0
    };

    let metrics = [mae, mse, rmse, r2, mape];
    if metrics.iter().any(|m| !m.is_finite()) {
        log::warn!("Non-finite accuracy metric replaced with 0.0");
    }
    let mape = finite_or_default(mape);
    let accuracy_percentage = if mape < 100.0 { (100.0 - mape).max(0.0) } else { 0.0 };

    AccuracyMetrics {
        mae: finite_or_default(mae),
        mse: finite_or_default(mse),
        rmse: finite_or_default(rmse),
        r2: finite_or_default(r2),
        mape,
        accuracy_percentage,
    }
}

/// Pair every observation with the fitted value of its date and score them.
/// Pairing is by date, not position, since the frame holds each date once.
pub fn evaluate_forecast(series: &ObservationSeries, forecast: &Forecast) -> AccuracyMetrics {
    let fitted = forecast.fitted_by_date();
    let pairs: Vec<(f64, f64)> = series
        .iter()
        .filter_map(|o| fitted.get(&o.date).map(|f| (o.value, *f)))
        .collect();
    evaluate(&pairs)
}
