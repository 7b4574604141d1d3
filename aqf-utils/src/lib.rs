//! Shared utility functions for AQF crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Output date format used throughout the JSON response: "YYYY-MM-DD"
    pub const OUTPUT_FORMAT: &str = "%Y-%m-%d";

    /// Date-only layouts tried in order. Two-digit years go first since `%Y`
    /// would otherwise read "24" as the year 24. The ISO layouts are
    /// unambiguous because they lead with a 4-digit year.
    const DATE_FORMATS: [&str; 10] = [
        "%d-%m-%y", "%d/%m/%y", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d",
        "%d-%b-%Y", "%d %b %Y", "%d %B %Y",
    ];

    /// Date-time layouts; only the calendar date is kept.
    const DATETIME_FORMATS: [&str; 8] = [
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(OUTPUT_FORMAT).to_string()
    }

    /// Parse a date cell using day-first conventions.
    ///
    /// `01-03-2024` is the 1st of March. Returns `None` for anything that
    /// does not parse, which callers treat as a missing value.
    pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

}

/// NaN-safe descriptive statistics.
///
/// Every function returns a finite number; an aggregate that cannot be
/// computed (empty input, non-finite intermediate) yields [`stats::DEFAULT`].
pub mod stats {
    /// Substitute for aggregates that would otherwise be non-finite.
    pub const DEFAULT: f64 = 0.0;

    /// Replace a non-finite value with [`DEFAULT`].
    pub fn finite_or_default(value: f64) -> f64 {
        if value.is_finite() {
            value
        } else {
            log::debug!("Replacing non-finite value {} with {}", value, DEFAULT);
            DEFAULT
        }
    }

    fn finite_values(values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|v| v.is_finite()).collect()
    }

    pub fn mean(values: &[f64]) -> f64 {
        let values = finite_values(values);
        if values.is_empty() {
            return DEFAULT;
        }
        finite_or_default(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Median; an even-length input averages the two middle values.
    pub fn median(values: &[f64]) -> f64 {
        let mut values = finite_values(values);
        if values.is_empty() {
            return DEFAULT;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
        finite_or_default(median)
    }

    pub fn max(values: &[f64]) -> f64 {
        finite_values(values)
            .into_iter()
            .reduce(f64::max)
            .unwrap_or(DEFAULT)
    }

    pub fn min(values: &[f64]) -> f64 {
        finite_values(values)
            .into_iter()
            .reduce(f64::min)
            .unwrap_or(DEFAULT)
    }

    /// Sample standard deviation (n - 1 denominator).
    /// Fewer than two values yields [`DEFAULT`].
    pub fn sample_std(values: &[f64]) -> f64 {
        let values = finite_values(values);
        if values.len() < 2 {
            return DEFAULT;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (values.len() - 1) as f64;
        finite_or_default(variance.sqrt())
    }

    /// Linear-interpolated quantile, `q` in [0, 1].
    pub fn quantile(values: &[f64], q: f64) -> f64 {
        let mut values = finite_values(values);
        if values.is_empty() {
            return DEFAULT;
        }
        values.sort_by(f64::total_cmp);
        let q = q.clamp(0.0, 1.0);
        let pos = q * (values.len() - 1) as f64;
        let lower = pos.floor() as usize;
        let upper = pos.ceil() as usize;
        let frac = pos - lower as f64;
        finite_or_default(values[lower] + (values[upper] - values[lower]) * frac)
    }

}

/// Error types
pub mod error {
    use serde_json::{json, Value};
    use std::time::Duration;
    use thiserror::Error;

    /// The four failure classes an analysis request can end in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ErrorKind {
        /// User-fixable input problems.
        Validation,
        /// Model fitting or prediction failed.
        Forecast,
        /// Model fitting exceeded the caller's time limit.
        ForecastTimeout,
        Internal,
    }

    impl ErrorKind {
        pub fn as_str(&self) -> &'static str {
            match self {
                ErrorKind::Validation => "ValidationError",
                ErrorKind::Forecast => "ForecastError",
                ErrorKind::ForecastTimeout => "ForecastTimeoutError",
                ErrorKind::Internal => "InternalError",
            }
        }

        /// HTTP-equivalent status code for a host that serves the analysis over HTTP.
        pub fn status_code(&self) -> u16 {
            match self {
                ErrorKind::Validation => 400,
                ErrorKind::Forecast => 500,
                ErrorKind::ForecastTimeout => 504,
                ErrorKind::Internal => 500,
            }
        }
    }

    #[derive(Debug, Error)]
    pub enum AnalysisError {
        #[error("Missing required column(s): {}. Available columns: {}", .missing.join(", "), .available.join(", "))]
        MissingColumns {
            missing: Vec<String>,
            available: Vec<String>,
        },

        #[error("No valid data found after parsing dates and values")]
        NoValidData,

        #[error("Malformed CSV: {0}")]
        Csv(String),

        #[error("Forecast failed: {0}. Please check the data quality (enough distinct dates, varying values).")]
        Forecast(String),

        #[error("Forecast did not finish within {} seconds", .0.as_secs_f64())]
        ForecastTimeout(Duration),

        #[error("Internal error: {0}")]
        Internal(String),
    }

    impl AnalysisError {
        pub fn kind(&self) -> ErrorKind {
            match self {
                AnalysisError::MissingColumns { .. }
                | AnalysisError::NoValidData
                | AnalysisError::Csv(_) => ErrorKind::Validation,
                AnalysisError::Forecast(_) => ErrorKind::Forecast,
                AnalysisError::ForecastTimeout(_) => ErrorKind::ForecastTimeout,
                AnalysisError::Internal(_) => ErrorKind::Internal,
            }
        }

        /// Structured failure body returned in place of an analysis.
        pub fn to_json(&self) -> Value {
            let mut body = json!({
                "status": "error",
                "error_type": self.kind().as_str(),
                "message": self.to_string(),
            });
            if let AnalysisError::MissingColumns { missing, available } = self {
                body["details"] = json!({
                    "missing_columns": missing,
                    "available_columns": available,
                });
            }
            body
        }
    }

    pub type Result<T> = std::result::Result<T, AnalysisError>;

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_columns_message_lists_headers() {
            let err = AnalysisError::MissingColumns {
                missing: vec!["pm25".to_string()],
                available: vec!["Date".to_string(), "Temp".to_string()],
            };
            let message = err.to_string();
            assert!(message.contains("pm25"));
            assert!(message.contains("Date, Temp"));
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(err.kind().status_code(), 400);

            let body = err.to_json();
            assert_eq!(body["status"], "error");
            assert_eq!(body["error_type"], "ValidationError");
            assert_eq!(body["details"]["available_columns"][1], "Temp");
        }

        #[test]
        fn test_error_kinds() {
            assert_eq!(AnalysisError::NoValidData.kind(), ErrorKind::Validation);
            assert_eq!(
                AnalysisError::Forecast("singular".into()).kind(),
                ErrorKind::Forecast
            );
            let timeout = AnalysisError::ForecastTimeout(Duration::from_secs(5));
            assert_eq!(timeout.kind(), ErrorKind::ForecastTimeout);
            assert_eq!(timeout.kind().status_code(), 504);
            assert!(timeout.to_string().contains('5'));
            assert!(AnalysisError::NoValidData
                .to_string()
                .contains("No valid data found"));
        }
    }
}
