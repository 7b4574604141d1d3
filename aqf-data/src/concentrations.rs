//! Latest known concentration of each pollutant present in a dataset.

use crate::columns::ColumnMap;
use crate::pollutant::Pollutant;
use crate::series::{extract_series, ObservationSeries};
use crate::table::RawTable;
use aqf_utils::error::Result;
use aqf_utils::stats;
use std::collections::BTreeMap;

/// Recent readings of one pollutant.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantReadings {
    pub series: ObservationSeries,
}

impl PollutantReadings {
    /// Latest non-missing value in chronological order.
    pub fn latest(&self) -> Option<f64> {
        self.series.latest().map(|o| o.value)
    }

    pub fn recent_average(&self, window: usize) -> f64 {
        let values: Vec<f64> = self.series.recent(window).iter().map(|o| o.value).collect();
        stats::mean(&values)
    }

    pub fn recent_maximum(&self, window: usize) -> f64 {
        let values: Vec<f64> = self.series.recent(window).iter().map(|o| o.value).collect();
        stats::max(&values)
    }
}

/// Pollutant → readings, for every mapped pollutant with at least one
/// valid reading. Iterates in pollutant declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollutantConcentrations(BTreeMap<Pollutant, PollutantReadings>);

impl PollutantConcentrations {
    /// Collect readings for each pollutant column in `columns`.
    ///
    /// A pollutant whose column has no parseable value is left out rather
    /// than reported as zero.
    pub fn from_table(table: &RawTable, columns: &ColumnMap) -> Result<Self> {
        let mut readings = BTreeMap::new();
        for pollutant in columns.present() {
            let header = match columns.get(pollutant) {
                Some(h) => h,
                None => continue,
            };
            let (series, report) = extract_series(table, &columns.date, header)?;
            if series.is_empty() {
                log::warn!(
                    "Column '{}' ({}) has no valid readings; omitting it",
                    header,
                    pollutant
                );
                continue;
            }
            log::debug!("{}: {} readings", pollutant, report.rows_valid());
            readings.insert(pollutant, PollutantReadings { series });
        }
        Ok(PollutantConcentrations(readings))
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<&PollutantReadings> {
        self.0.get(&pollutant)
    }

    /// Latest concentration of each pollutant, in declaration order.
    pub fn latest(&self) -> Vec<(Pollutant, f64)> {
        self.0
            .iter()
            .filter_map(|(p, r)| r.latest().map(|v| (*p, v)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pollutant, &PollutantReadings)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
