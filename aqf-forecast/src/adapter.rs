use crate::model::{AdditiveModel, ModelConfig};
use aqf_data::date_range::DateRange;
use aqf_data::ObservationSeries;
use aqf_utils::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

/// One row of the forecast frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
}

/// The forecast frame: every distinct historical date followed by
/// `horizon` future days.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    points: Vec<ForecastPoint>,
    horizon: usize,
}

impl Forecast {
    pub fn new(points: Vec<ForecastPoint>, horizon: usize) -> Self {
        let horizon = horizon.min(points.len());
        Forecast { points, horizon }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// The future tail, which is the public prediction set.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.points.len() - self.horizon..]
    }

    /// The historical part of the frame.
    pub fn history(&self) -> &[ForecastPoint] {
        &self.points[..self.points.len() - self.horizon]
    }

    /// In-sample estimates keyed by date.
    pub fn fitted_by_date(&self) -> HashMap<NaiveDate, f64> {
        self.history().iter().map(|p| (p.date, p.yhat)).collect()
    }
}

/// Fits a model to a series and extends it `horizon` days past the last
/// observation. Implementations report failure as `AnalysisError::Forecast`
/// and never fall back to a default forecast.
pub trait Forecaster {
    fn fit_predict(&self, series: &ObservationSeries, horizon: usize) -> Result<Forecast>;
}

/// [`Forecaster`] backed by [`AdditiveModel`].
#[derive(Debug, Clone, Default)]
pub struct AdditiveForecaster {
    config: ModelConfig,
}

impl AdditiveForecaster {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

impl Forecaster for AdditiveForecaster {
    fn fit_predict(&self, series: &ObservationSeries, horizon: usize) -> Result<Forecast> {
        let started = Instant::now();
        let model = AdditiveModel::fit(series, &self.config)?;

        let mut dates = series.unique_dates();
        dates.extend(DateRange::following(model.last_date(), horizon));
        let points = model
            .predict(&dates)?
            .into_iter()
            .map(|p| ForecastPoint {
                date: p.date,
                yhat: p.yhat,
                yhat_lower: p.yhat_lower,
                yhat_upper: p.yhat_upper,
                trend: p.trend,
            })
            .collect();
        let forecast = Forecast::new(points, horizon);
        log::info!(
            "Forecast of {} days fitted with {} changepoints in {:.1?}",
            forecast.horizon(),
            model.changepoint_count(),
            started.elapsed()
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqf_data::Observation;
    use chrono::Days;

    #[test]
    fn test_frame_covers_history_and_horizon() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        // gap on day 3 and a duplicated day 5
        let offsets = [0u64, 1, 2, 4, 5, 5, 6, 7, 8, 9];
        let series = ObservationSeries::new(
            offsets
                .iter()
                .enumerate()
                .map(|(i, d)| Observation::new(start + Days::new(*d), 40.0 + i as f64))
                .collect(),
        );
        let forecast = AdditiveForecaster::default().fit_predict(&series, 7).unwrap();

        assert_eq!(forecast.points().len(), 9 + 7);
        assert_eq!(forecast.horizon(), 7);
        assert_eq!(forecast.future().len(), 7);
        assert_eq!(forecast.future()[0].date, start + Days::new(10));
        assert_eq!(forecast.future()[6].date, start + Days::new(16));

        let fitted = forecast.fitted_by_date();
        assert_eq!(fitted.len(), 9);
        assert!(!fitted.contains_key(&(start + Days::new(3))));
        for point in forecast.points() {
            assert!(point.yhat_lower <= point.yhat && point.yhat <= point.yhat_upper);
        }
    }

    #[test]
    fn test_fit_failure_is_reported() {
        let series = ObservationSeries::new(vec![Observation::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            12.0,
        )]);
        let err = AdditiveForecaster::default().fit_predict(&series, 30).unwrap_err();
        assert_eq!(err.kind(), aqf_utils::error::ErrorKind::Forecast);
    }
}
