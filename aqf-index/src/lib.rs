//! Air Quality Index calculation and interpretation.
//!
//! Concentrations are converted to per-pollutant sub-indices with the EPA
//! piecewise-linear breakpoint formula ([`composite`]), the highest
//! sub-index names the dominant pollutant, and any AQI scalar can be mapped
//! to a category, display color and health guidance ([`category`], [`health`]).

pub mod breakpoints;
pub mod category;
pub mod composite;
pub mod health;

pub use category::{classify, haze_intensity, AqiCategory};
pub use composite::{aqi_breakdown, primary_pollutant, sub_index, AqiBreakdown, PrimaryPollutant};
pub use health::{health_recommendations, HealthRecommendation, RiskLevel};
