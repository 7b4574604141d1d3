//! Series Normalizer and the chronologically ordered series it produces.

use crate::table::RawTable;
use aqf_utils::dates::parse_day_first;
use aqf_utils::error::{AnalysisError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// A single dated reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Observations sorted ascending by date. Immutable once built.
///
/// Sorting is stable, so rows sharing a date keep their file order and the
/// last of them is the "latest".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationSeries(Vec<Observation>);

impl ObservationSeries {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        ObservationSeries(observations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.0.first()
    }

    /// The chronologically latest observation.
    pub fn latest(&self) -> Option<&Observation> {
        self.0.last()
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|o| o.value).collect()
    }

    /// The most recent `n` observations (all of them when shorter).
    pub fn recent(&self, n: usize) -> &[Observation] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    /// Sorted, de-duplicated dates.
    pub fn unique_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.0.iter().map(|o| o.date).collect();
        dates.dedup();
        dates
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Row accounting of one normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NormalizeReport {
    pub rows_total: usize,
    pub invalid_dates: usize,
    pub invalid_values: usize,
}

impl NormalizeReport {
    pub fn rows_valid(&self) -> usize {
        self.rows_total - self.invalid_dates - self.invalid_values
    }

    pub fn rows_dropped(&self) -> usize {
        self.invalid_dates + self.invalid_values
    }
}

/// Parse a numeric cell. Blank, non-numeric and non-finite cells are missing.
pub fn parse_value(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Build the series for `value_column`, keyed by `date_column`, dropping any
/// row whose date or value does not parse. May be empty.
pub fn extract_series(
    table: &RawTable,
    date_column: &str,
    value_column: &str,
) -> Result<(ObservationSeries, NormalizeReport)> {
    let date_idx = table.column_index(date_column).ok_or_else(|| {
        AnalysisError::Internal(format!("column '{}' not in table", date_column))
    })?;
    let value_idx = table.column_index(value_column).ok_or_else(|| {
        AnalysisError::Internal(format!("column '{}' not in table", value_column))
    })?;

    let mut report = NormalizeReport {
        rows_total: table.len(),
        ..NormalizeReport::default()
    };
    let mut observations = Vec::with_capacity(table.len());
    for (date_cell, value_cell) in table.column(date_idx).zip(table.column(value_idx)) {
        let date = match parse_day_first(date_cell) {
            Some(d) => d,
            None => {
                report.invalid_dates += 1;
                continue;
            }
        };
        let value = match parse_value(value_cell) {
            Some(v) => v,
            None => {
                report.invalid_values += 1;
                continue;
            }
        };
        observations.push(Observation::new(date, value));
    }

    Ok((ObservationSeries::new(observations), report))
}

/// Normalize the primary series. Zero surviving rows is a validation error.
pub fn normalize(
    table: &RawTable,
    date_column: &str,
    value_column: &str,
) -> Result<(ObservationSeries, NormalizeReport)> {
    let (series, report) = extract_series(table, date_column, value_column)?;
    log::info!(
        "Normalized '{}': {} of {} rows valid ({} bad dates, {} bad values)",
        value_column,
        report.rows_valid(),
        report.rows_total,
        report.invalid_dates,
        report.invalid_values
    );
    if series.is_empty() {
        return Err(AnalysisError::NoValidData);
    }
    Ok((series, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn is_sorted(series: &ObservationSeries) -> bool {
        series.as_slice().windows(2).all(|w| w[0].date <= w[1].date)
    }

    #[test]
    fn test_ten_consecutive_days() {
        let mut csv = String::from("Date,PM25\n");
        for day in 1..=10 {
            csv.push_str(&format!("{:02}-03-2024,{}\n", day, 40 + day));
        }
        let table = RawTable::from_csv_str(&csv).unwrap();
        let (series, report) = normalize(&table, "Date", "PM25").unwrap();
        assert_eq!(series.len(), 10);
        assert_eq!(report.rows_valid(), 10);
        assert_eq!(series.first().unwrap().date, date(2024, 3, 1));
        assert_eq!(series.latest().unwrap().date, date(2024, 3, 10));
        assert_eq!(series.latest().unwrap().value, 50.0);
        assert!(is_sorted(&series));
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let csv = "date,pm25\n05-01-2024,5\n01-01-2024,1\n03-01-2024,3\n02-01-2024,2\n04-01-2024,4\n";
        let table = RawTable::from_csv_str(csv).unwrap();
        let (series, _) = normalize(&table, "date", "pm25").unwrap();
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        // latest is chronological, not the last row of the file
        assert_eq!(series.latest().unwrap().value, 5.0);
    }

    #[test]
    fn test_sorted_for_every_row_order() {
        let rows = ["03-01-2024,3", "01-01-2024,1", "02-01-2024,2", "04-01-2024,4"];
        // all rotations and their reversals
        for shift in 0..rows.len() {
            for reverse in [false, true] {
                let mut order: Vec<&str> = rows.iter().cycle().skip(shift).take(rows.len()).copied().collect();
                if reverse {
                    order.reverse();
                }
                let csv = format!("date,pm25\n{}\n", order.join("\n"));
                let table = RawTable::from_csv_str(&csv).unwrap();
                let (series, _) = normalize(&table, "date", "pm25").unwrap();
                assert!(is_sorted(&series));
                assert_eq!(series.values(), vec![1.0, 2.0, 3.0, 4.0]);
                let resorted = ObservationSeries::new(series.as_slice().to_vec());
                assert_eq!(resorted, series);
            }
        }
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let csv = "date,pm25\n01-01-2024,10\nnot-a-date,20\n03-01-2024,\n04-01-2024,abc\n05-01-2024,NaN\n06-01-2024,60\n";
        let table = RawTable::from_csv_str(csv).unwrap();
        let (series, report) = normalize(&table, "date", "pm25").unwrap();
        assert_eq!(series.values(), vec![10.0, 60.0]);
        assert_eq!(report.rows_total, 6);
        assert_eq!(report.invalid_dates, 1);
        assert_eq!(report.invalid_values, 3);
        assert_eq!(report.rows_dropped(), 4);
    }

    #[test]
    fn test_no_valid_rows_is_an_error() {
        let csv = "date,pm25\nyesterday,10\n01-01-2024,n/a\n";
        let table = RawTable::from_csv_str(csv).unwrap();
        let err = normalize(&table, "date", "pm25").unwrap_err();
        assert!(matches!(err, AnalysisError::NoValidData));
        assert!(err.to_string().contains("No valid data found"));
    }

    #[test]
    fn test_recent_window() {
        let observations = (1..=40)
            .map(|d| Observation::new(date(2024, 1, 1) + chrono::Days::new(d), d as f64))
            .collect();
        let series = ObservationSeries::new(observations);
        let recent = series.recent(30);
        assert_eq!(recent.len(), 30);
        assert_eq!(recent[0].value, 11.0);
        assert_eq!(series.recent(100).len(), 40);
    }

    #[test]
    fn test_duplicate_dates_keep_file_order() {
        let csv = "date,pm25\n02-01-2024,7\n01-01-2024,1\n02-01-2024,9\n";
        let table = RawTable::from_csv_str(csv).unwrap();
        let (series, _) = normalize(&table, "date", "pm25").unwrap();
        assert_eq!(series.values(), vec![1.0, 7.0, 9.0]);
        assert_eq!(series.unique_dates().len(), 2);
        assert_eq!(series.latest().map(|o| o.value), Some(9.0));
        let dates: Vec<_> = series.iter().map(|o| o.date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
        assert!(dates.windows(2).any(|w| w[0] == w[1]));
    }
}
