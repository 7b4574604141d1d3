//! Forecasting for daily air-quality series.
//!
//! [`Forecaster`] is the boundary the analysis pipeline talks to. The
//! shipped implementation, [`AdditiveForecaster`], fits a piecewise-linear
//! trend plus Fourier seasonality by penalised least squares and reports
//! empirical residual intervals. [`accuracy`] scores the in-sample fit.

pub mod accuracy;
pub mod adapter;
pub mod model;
pub mod seasonality;
pub mod trend;

pub use accuracy::{evaluate, evaluate_forecast, AccuracyMetrics};
pub use adapter::{AdditiveForecaster, Forecast, ForecastPoint, Forecaster};
pub use model::{AdditiveModel, ModelConfig, SeasonalityMode};
