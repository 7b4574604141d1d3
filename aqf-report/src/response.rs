//! Typed sections of the analysis report.

use crate::config::AnalysisMode;
use crate::statistics::{Statistics, TrendDirection};
use aqf_data::Pollutant;
use aqf_forecast::{AccuracyMetrics, ForecastPoint};
use aqf_index::{classify, haze_intensity, AqiBreakdown, HealthRecommendation, PrimaryPollutant};
use aqf_utils::dates::format_date;
use aqf_utils::stats::finite_or_default;
use serde::Serialize;
use std::collections::BTreeMap;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub latest: f64,
    pub predicted: f64,
    pub category: &'static str,
    pub color: &'static str,
    pub pollutant_levels: BTreeMap<Pollutant, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionEntry {
    pub date: String,
    pub predicted_aqi: f64,
    pub category: &'static str,
    pub color: &'static str,
    pub haze_intensity: u8,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub trend: f64,
}

impl From<&ForecastPoint> for PredictionEntry {
    /// The point estimate is read directly as an AQI value. A non-finite
    /// estimate reads as 0.0.
    fn from(point: &ForecastPoint) -> Self {
        let yhat = finite_or_default(point.yhat);
        let (category, color) = classify(yhat);
        PredictionEntry {
            date: format_date(&point.date),
            predicted_aqi: yhat,
            category,
            color,
            haze_intensity: haze_intensity(yhat),
            confidence_lower: point.yhat_lower,
            confidence_upper: point.yhat_upper,
            trend: point.trend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterAnalysis {
    pub latest_value: f64,
    pub average_30_days: f64,
    pub maximum_30_days: f64,
    pub unit: &'static str,
    pub aqi: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// AQI of the dominant pollutant.
    pub overall_aqi: f64,
    pub overall_category: &'static str,
    pub overall_color: &'static str,
    pub primary_pollutant: Pollutant,
    pub trend_direction: TrendDirection,
}

impl Summary {
    pub fn new(primary: &PrimaryPollutant, trend_direction: TrendDirection) -> Self {
        let (overall_category, overall_color) = classify(primary.aqi_value);
        Summary {
            overall_aqi: primary.aqi_value,
            overall_category,
            overall_color,
            primary_pollutant: primary.pollutant,
            trend_direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub rows_total: usize,
    pub rows_valid: usize,
    pub rows_dropped: usize,
    pub parameters_analyzed: Vec<Pollutant>,
    pub columns_detected: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiGeneration {
    pub prompt: String,
    pub gemini_url: String,
}

/// Metadata of an uploaded reference photo. The photo itself is handed
/// to image rendering, which is not part of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceImage {
    pub file_name: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub analysis_type: AnalysisMode,
    pub current_conditions: CurrentConditions,
    pub predictions: Vec<PredictionEntry>,
    pub statistics: Statistics,
    pub aqi_breakdown: AqiBreakdown,
    pub primary_pollutant: PrimaryPollutant,
    pub multi_parameter_analysis: BTreeMap<Pollutant, ParameterAnalysis>,
    pub health_recommendations: HealthRecommendation,
    pub model_evaluation: AccuracyMetrics,
    pub summary: Summary,
    pub data_summary: DataSummary,
    pub ai_generation: AiGeneration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<ReferenceImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub analysis_type: AnalysisMode,
    pub current_conditions: CurrentConditions,
    pub predictions: Vec<PredictionEntry>,
    pub statistics: Statistics,
    pub aqi_breakdown: AqiBreakdown,
    pub primary_pollutant: PrimaryPollutant,
    pub health_recommendations: HealthRecommendation,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prediction_entry_classifies_point_estimate() {
        let point = ForecastPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            yhat: 120.0,
            yhat_lower: 100.0,
            yhat_upper: 150.0,
            trend: 118.0,
        };
        let entry = PredictionEntry::from(&point);
        assert_eq!(entry.date, "2024-03-11");
        assert_eq!(entry.category, "Unhealthy for Sensitive Groups");
        assert_eq!(entry.color, "#ff7e00");
        assert_eq!(entry.haze_intensity, 60);
        assert_eq!(entry.confidence_lower, 100.0);
        assert_eq!(entry.confidence_upper, 150.0);
    }

    #[test]
    fn test_prediction_entry_with_non_finite_estimate() {
        let point = ForecastPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            yhat: f64::NAN,
            yhat_lower: 10.0,
            yhat_upper: 20.0,
            trend: 15.0,
        };
        let entry = PredictionEntry::from(&point);
        assert_eq!(entry.predicted_aqi, 0.0);
        assert_eq!(entry.category, "Good");
        assert_eq!(entry.color, "#00e400");
        assert_eq!(entry.haze_intensity, 0);
    }

    #[test]
    fn test_summary_follows_dominant_pollutant() {
        let primary = PrimaryPollutant {
            pollutant: Pollutant::Pm10,
            aqi_value: 123.0,
        };
        let summary = Summary::new(&primary, TrendDirection::Stable);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["overall_aqi"], 123.0);
        assert_eq!(json["overall_category"], "Unhealthy for Sensitive Groups");
        assert_eq!(json["primary_pollutant"], "pm10");
        assert_eq!(json["trend_direction"], "Stable");
    }
}
