//! Additive trend + seasonality model.
//!
//! `y(t) = trend(t) + Σ seasonality(t)`, where the trend is piecewise linear
//! with changepoints and each seasonality is a truncated Fourier series. All
//! coefficients are fitted in one ridge-penalised least-squares solve: the
//! prior scales become penalties `1 / scale²` on the corresponding columns,
//! so a tight changepoint prior keeps the trend close to a straight line.

use crate::seasonality::{fourier_features, Seasonality};
use crate::trend::{changepoint_features, day_offset, piecewise_linear, select_changepoints};
use aqf_data::ObservationSeries;
use aqf_utils::error::{AnalysisError, Result};
use aqf_utils::stats::quantile;
use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// History length (days) from which weekly seasonality turns on in `auto` mode.
pub const WEEKLY_MIN_SPAN_DAYS: i64 = 14;
/// History length (days) from which yearly seasonality turns on in `auto` mode.
pub const YEARLY_MIN_SPAN_DAYS: i64 = 730;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// Enabled when the history is long enough to observe the cycle twice.
    #[default]
    Auto,
    On,
    Off,
}

impl SeasonalityMode {
    fn enabled(&self, span_days: i64, min_span_days: i64) -> bool {
        match self {
            SeasonalityMode::Auto => span_days >= min_span_days,
            SeasonalityMode::On => true,
            SeasonalityMode::Off => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub weekly_seasonality: SeasonalityMode,
    pub yearly_seasonality: SeasonalityMode,
    pub weekly_fourier_order: usize,
    pub yearly_fourier_order: usize,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub interval_width: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weekly_seasonality: SeasonalityMode::Auto,
            yearly_seasonality: SeasonalityMode::Auto,
            weekly_fourier_order: 3,
            yearly_fourier_order: 10,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.80,
        }
    }
}

impl ModelConfig {
    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    pub fn with_weekly_seasonality(mut self, mode: SeasonalityMode) -> Self {
        self.weekly_seasonality = mode;
        self
    }

    pub fn with_yearly_seasonality(mut self, mode: SeasonalityMode) -> Self {
        self.yearly_seasonality = mode;
        self
    }

    fn penalty(prior_scale: f64) -> f64 {
        if prior_scale > 0.0 && prior_scale.is_finite() {
            1.0 / (prior_scale * prior_scale)
        } else {
            0.0
        }
    }
}

/// A fitted model. Holds everything needed to predict any date.
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    start: NaiveDate,
    last: NaiveDate,
    span_days: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    seasonalities: Vec<Seasonality>,
    k: f64,
    m: f64,
    deltas: Vec<f64>,
    seasonal_betas: Vec<f64>,
    residual_low: f64,
    residual_high: f64,
}

/// One predicted day, in the units of the fitted series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
}

impl AdditiveModel {
    pub fn fit(series: &ObservationSeries, config: &ModelConfig) -> Result<AdditiveModel> {
        let (first, last) = match (series.first(), series.latest()) {
            (Some(first), Some(last)) if series.len() >= 2 => (first.date, last.date),
            _ => {
                return Err(AnalysisError::Forecast(format!(
                    "at least 2 observations are required, got {}",
                    series.len()
                )))
            }
        };
        let span = (last - first).num_days();
        if span <= 0 {
            return Err(AnalysisError::Forecast(
                "all observations share a single date".to_string(),
            ));
        }

        let values = series.values();
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi - lo <= 1e-12 * hi.abs().max(1.0) {
            return Err(AnalysisError::Forecast(format!(
                "series is constant at {}",
                hi
            )));
        }
        let y_scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));

        let span_days = span as f64;
        let unique_t: Vec<f64> = series
            .unique_dates()
            .iter()
            .map(|d| day_offset(first, *d) / span_days)
            .collect();
        let changepoints =
            select_changepoints(&unique_t, config.n_changepoints, config.changepoint_range);

        let mut seasonalities = Vec::new();
        if config.weekly_seasonality.enabled(span, WEEKLY_MIN_SPAN_DAYS) {
            seasonalities.push(Seasonality::weekly(config.weekly_fourier_order));
        }
        if config.yearly_seasonality.enabled(span, YEARLY_MIN_SPAN_DAYS) {
            seasonalities.push(Seasonality::yearly(config.yearly_fourier_order));
        }
        log::info!(
            "Fitting additive model: {} observations over {} days, {} changepoints, seasonalities [{}]",
            series.len(),
            span,
            changepoints.len(),
            seasonalities
                .iter()
                .map(|s| s.name)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let n_cp = changepoints.len();
        let n_cols = 2 + n_cp + seasonalities.iter().map(Seasonality::width).sum::<usize>();
        let rows: Vec<Vec<f64>> = series
            .iter()
            .map(|o| design_row(day_offset(first, o.date), span_days, &changepoints, &seasonalities))
            .collect();
        let x = DMatrix::from_fn(rows.len(), n_cols, |i, j| rows[i][j]);
        let y = DVector::from_iterator(values.len(), values.iter().map(|v| v / y_scale));

        // Intercept and slope are unpenalised apart from a tiny jitter.
        let cp_penalty = ModelConfig::penalty(config.changepoint_prior_scale);
        let season_penalty = ModelConfig::penalty(config.seasonality_prior_scale);
        let penalties = DVector::from_fn(n_cols, |j, _| match j {
            0 | 1 => 1e-9,
            j if j < 2 + n_cp => cp_penalty,
            _ => season_penalty,
        });

        let xt = x.transpose();
        let gram = &xt * &x + DMatrix::from_diagonal(&penalties);
        let rhs = &xt * &y;
        let beta = gram
            .cholesky()
            .ok_or_else(|| {
                AnalysisError::Forecast("normal equations are singular".to_string())
            })?
            .solve(&rhs);
        if beta.iter().any(|b| !b.is_finite()) {
            return Err(AnalysisError::Forecast(
                "model coefficients are not finite".to_string(),
            ));
        }

        let residuals: Vec<f64> = (&y - &x * &beta).iter().copied().collect();
        let width = config.interval_width.clamp(0.0, 1.0);
        let residual_low = quantile(&residuals, (1.0 - width) / 2.0).min(0.0);
        let residual_high = quantile(&residuals, (1.0 + width) / 2.0).max(0.0);

        let beta: Vec<f64> = beta.iter().copied().collect();
        Ok(AdditiveModel {
            start: first,
            last,
            span_days,
            y_scale,
            k: beta[1],
            m: beta[0],
            deltas: beta[2..2 + n_cp].to_vec(),
            seasonal_betas: beta[2 + n_cp..].to_vec(),
            changepoints,
            seasonalities,
            residual_low,
            residual_high,
        })
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last
    }

    pub fn changepoint_count(&self) -> usize {
        self.changepoints.len()
    }

    pub fn seasonality_names(&self) -> Vec<&'static str> {
        self.seasonalities.iter().map(|s| s.name).collect()
    }

    /// Predict each date. Bounds widen with the square root of the distance
    /// past the last observed date, relative to the history span.
    pub fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<Prediction>> {
        let mut out = Vec::with_capacity(dates.len());
        for &date in dates {
            let offset = day_offset(self.start, date);
            let t = offset / self.span_days;
            let trend = piecewise_linear(self.k, self.m, &self.deltas, &self.changepoints, t);
            let seasonal: f64 = seasonal_features(offset, &self.seasonalities)
                .iter()
                .zip(&self.seasonal_betas)
                .map(|(x, b)| x * b)
                .sum();
            let yhat = trend + seasonal;

            let ahead = day_offset(self.last, date).max(0.0);
            let widen = (1.0 + ahead / self.span_days).sqrt();
            let prediction = Prediction {
                date,
                yhat: yhat * self.y_scale,
                yhat_lower: (yhat + self.residual_low * widen) * self.y_scale,
                yhat_upper: (yhat + self.residual_high * widen) * self.y_scale,
                trend: trend * self.y_scale,
            };
            if ![
                prediction.yhat,
                prediction.yhat_lower,
                prediction.yhat_upper,
                prediction.trend,
            ]
            .iter()
            .all(|v| v.is_finite())
            {
                return Err(AnalysisError::Forecast(format!(
                    "prediction for {} is not finite",
                    date
                )));
            }
            out.push(prediction);
        }
        Ok(out)
    }
}

fn seasonal_features(offset: f64, seasonalities: &[Seasonality]) -> Vec<f64> {
    seasonalities
        .iter()
        .flat_map(|s| fourier_features(offset, s.period, s.order))
        .collect()
}

fn design_row(
    offset: f64,
    span_days: f64,
    changepoints: &[f64],
    seasonalities: &[Seasonality],
) -> Vec<f64> {
    let t = offset / span_days;
    let mut row = vec![1.0, t];
    row.extend(changepoint_features(t, changepoints));
    row.extend(seasonal_features(offset, seasonalities));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqf_data::Observation;
    use chrono::Days;

    fn daily_series(values: &[f64]) -> ObservationSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ObservationSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Observation::new(start + Days::new(i as u64), *v))
                .collect(),
        )
    }

    #[test]
    fn test_fits_linear_series() {
        let values: Vec<f64> = (0..60).map(|i| 20.0 + 0.5 * i as f64).collect();
        let series = daily_series(&values);
        let model = AdditiveModel::fit(&series, &ModelConfig::default()).unwrap();
        let next = model.last_date() + Days::new(1);
        let preds = model.predict(&[next]).unwrap();
        // 20 + 0.5 * 60
        assert!((preds[0].yhat - 50.0).abs() < 1.0, "yhat {}", preds[0].yhat);
        assert!(preds[0].yhat_lower <= preds[0].yhat);
        assert!(preds[0].yhat_upper >= preds[0].yhat);
    }

    #[test]
    fn test_changepoints_cover_early_history() {
        let values: Vec<f64> = (0..60).map(|i| 20.0 + 0.5 * i as f64).collect();
        let series = daily_series(&values);
        let model = AdditiveModel::fit(&series, &ModelConfig::default()).unwrap();
        assert_eq!(model.changepoint_count(), 25);

        let config = ModelConfig {
            n_changepoints: 0,
            ..ModelConfig::default()
        };
        let model = AdditiveModel::fit(&series, &config).unwrap();
        assert_eq!(model.changepoint_count(), 0);
    }

    #[test]
    fn test_recovers_weekly_cycle() {
        let values: Vec<f64> = (0..84)
            .map(|i| 50.0 + if i % 7 == 5 || i % 7 == 6 { -15.0 } else { 5.0 })
            .collect();
        let series = daily_series(&values);
        let model = AdditiveModel::fit(&series, &ModelConfig::default()).unwrap();
        assert_eq!(model.seasonality_names(), vec!["weekly"]);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let weekday = model.predict(&[start + Days::new(86)]).unwrap()[0].yhat;
        let weekend = model.predict(&[start + Days::new(89)]).unwrap()[0].yhat;
        assert!(weekday - weekend > 10.0, "weekday {weekday} weekend {weekend}");
    }

    #[test]
    fn test_seasonality_modes() {
        let values: Vec<f64> = (0..10).map(|i| (i * 3 % 7) as f64).collect();
        let series = daily_series(&values);
        let model = AdditiveModel::fit(&series, &ModelConfig::default()).unwrap();
        assert!(model.seasonality_names().is_empty());

        let config = ModelConfig::default()
            .with_weekly_seasonality(SeasonalityMode::On)
            .with_yearly_seasonality(SeasonalityMode::Off);
        let model = AdditiveModel::fit(&series, &config).unwrap();
        assert_eq!(model.seasonality_names(), vec!["weekly"]);
    }

    #[test]
    fn test_intervals_widen_with_horizon() {
        let values: Vec<f64> = (0..40).map(|i| 30.0 + ((i * 7) % 11) as f64).collect();
        let series = daily_series(&values);
        let model = AdditiveModel::fit(&series, &ModelConfig::default()).unwrap();
        let last = model.last_date();
        let preds = model
            .predict(&[last, last + Days::new(1), last + Days::new(30)])
            .unwrap();
        let width = |p: &Prediction| p.yhat_upper - p.yhat_lower;
        assert!(width(&preds[0]) > 0.0);
        assert!(width(&preds[1]) > width(&preds[0]));
        assert!(width(&preds[2]) > width(&preds[1]));
    }

    #[test]
    fn test_rejects_degenerate_series() {
        let single = daily_series(&[42.0]);
        assert!(matches!(
            AdditiveModel::fit(&single, &ModelConfig::default()),
            Err(AnalysisError::Forecast(_))
        ));

        let constant = daily_series(&[42.0; 10]);
        let err = AdditiveModel::fit(&constant, &ModelConfig::default()).unwrap_err();
        assert!(err.to_string().contains("constant"));

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let same_day = ObservationSeries::new(vec![
            Observation::new(day, 1.0),
            Observation::new(day, 2.0),
        ]);
        assert!(AdditiveModel::fit(&same_day, &ModelConfig::default()).is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"weekly_seasonality": "off", "n_changepoints": 5}"#).unwrap();
        assert_eq!(config.weekly_seasonality, SeasonalityMode::Off);
        assert_eq!(config.n_changepoints, 5);
        assert_eq!(config.yearly_fourier_order, 10);
        assert_eq!(config.interval_width, 0.80);
    }
}
