//! Descriptive statistics over the most recent observations.
//!
//! Standard deviation is the sample deviation (n - 1); a window of fewer
//! than two observations reports 0.0. Every aggregate that would be
//! non-finite is reported as 0.0.

use aqf_data::{Observation, ObservationSeries};
use aqf_utils::dates::format_date;
use aqf_utils::stats;
use serde::Serialize;

/// Slope above which the recent trend is worsening.
pub const WORSENING_SLOPE: f64 = 1.0;
/// Slope below which the recent trend is improving.
pub const IMPROVING_SLOPE: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Worsening,
    Improving,
    Stable,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> TrendDirection {
        if slope > WORSENING_SLOPE {
            TrendDirection::Worsening
        } else if slope < IMPROVING_SLOPE {
            TrendDirection::Improving
        } else {
            TrendDirection::Stable
        }
    }
}

/// `(newest - oldest) / window length`, 0.0 for an empty window.
pub fn trend_slope(window: &[Observation]) -> f64 {
    match (window.first(), window.last()) {
        (Some(oldest), Some(newest)) => {
            stats::finite_or_default((newest.value - oldest.value) / window.len() as f64)
        }
        _ => stats::DEFAULT,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DateSpan {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentStatistics {
    pub average: f64,
    pub median: f64,
    pub maximum: f64,
    pub minimum: f64,
    pub std_dev: f64,
    pub trend_direction: TrendDirection,
    pub trend_slope: f64,
    pub days_above_safe: usize,
    pub window_size: usize,
}

impl RecentStatistics {
    pub fn from_window(window: &[Observation], safe_threshold: f64) -> Self {
        let values: Vec<f64> = window.iter().map(|o| o.value).collect();
        let slope = trend_slope(window);
        RecentStatistics {
            average: stats::mean(&values),
            median: stats::median(&values),
            maximum: stats::max(&values),
            minimum: stats::min(&values),
            std_dev: stats::sample_std(&values),
            trend_direction: TrendDirection::from_slope(slope),
            trend_slope: slope,
            days_above_safe: values.iter().filter(|v| **v > safe_threshold).count(),
            window_size: window.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_records: usize,
    pub date_range: DateSpan,
    pub recent_30_days: RecentStatistics,
}

/// Summarize the last `window` observations of a sorted series. Short
/// series are summarized whole.
pub fn summarize(series: &ObservationSeries, window: usize, safe_threshold: f64) -> Statistics {
    let date_range = match (series.first(), series.latest()) {
        (Some(first), Some(last)) => DateSpan {
            start: format_date(&first.date),
            end: format_date(&last.date),
        },
        _ => DateSpan::default(),
    };
    Statistics {
        total_records: series.len(),
        date_range,
        recent_30_days: RecentStatistics::from_window(series.recent(window), safe_threshold),
    }
}
