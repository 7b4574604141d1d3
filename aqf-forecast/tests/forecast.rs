use aqf_data::{Observation, ObservationSeries};
use aqf_forecast::{evaluate_forecast, AdditiveForecaster, Forecaster, ModelConfig};
use chrono::{Days, NaiveDate};

fn seasonal_series(days: u64) -> ObservationSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    ObservationSeries::new(
        (0..days)
            .map(|i| {
                let weekly = if i % 7 >= 5 { -8.0 } else { 4.0 };
                Observation::new(start + Days::new(i), 60.0 + 0.1 * i as f64 + weekly)
            })
            .collect(),
    )
}

#[test]
fn weekly_pattern_is_fitted_closely() {
    let series = seasonal_series(120);
    let forecast = AdditiveForecaster::default().fit_predict(&series, 30).unwrap();
    assert_eq!(forecast.history().len(), 120);
    assert_eq!(forecast.future().len(), 30);

    let metrics = evaluate_forecast(&series, &forecast);
    assert!(metrics.mape < 5.0, "mape {}", metrics.mape);
    assert!(metrics.r2 > 0.9, "r2 {}", metrics.r2);
    assert!((metrics.accuracy_percentage - (100.0 - metrics.mape)).abs() < 1e-9);
}

#[test]
fn forecast_continues_the_trend() {
    let series = seasonal_series(120);
    let forecast = AdditiveForecaster::new(ModelConfig::default().with_interval_width(0.95))
        .fit_predict(&series, 28)
        .unwrap();
    let future = forecast.future();
    let first_week: f64 = future[..7].iter().map(|p| p.yhat).sum::<f64>() / 7.0;
    let last_week: f64 = future[21..].iter().map(|p| p.yhat).sum::<f64>() / 7.0;
    // 0.1 per day over three weeks
    assert!((last_week - first_week - 2.1).abs() < 1.0, "{first_week} -> {last_week}");
    assert!(future.iter().all(|p| p.yhat_lower <= p.yhat && p.yhat <= p.yhat_upper));
}
