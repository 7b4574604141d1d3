//! Column Resolver: loosely-named CSV headers to canonical fields.

use crate::pollutant::Pollutant;
use aqf_utils::error::{AnalysisError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Accepted spellings of the date column.
pub const DATE_ALIASES: &[&str] = &["date", "datetime", "date_time", "timestamp", "time", "day", "ds"];

/// Canonical field name of the date column.
pub const DATE_FIELD: &str = "date";

/// Canonical field → original header that matched one of its aliases.
///
/// `date` and `pm25` are always present; the other pollutants only when the
/// dataset carries them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMap {
    pub date: String,
    pub pollutants: BTreeMap<Pollutant, String>,
}

impl ColumnMap {
    pub fn get(&self, pollutant: Pollutant) -> Option<&str> {
        self.pollutants.get(&pollutant).map(String::as_str)
    }

    /// Header of the primary series.
    pub fn pm25(&self) -> &str {
        self.get(Pollutant::Pm25).unwrap_or_default()
    }

    /// Pollutants present, in declaration order.
    pub fn present(&self) -> impl Iterator<Item = Pollutant> + '_ {
        self.pollutants.keys().copied()
    }

    /// `field → header` pairs for reporting, date first.
    pub fn to_field_map(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        out.insert(DATE_FIELD.to_string(), self.date.clone());
        for (pollutant, header) in &self.pollutants {
            out.insert(pollutant.key().to_string(), header.clone());
        }
        out
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// First header (in header order) whose normalized form exactly matches one
/// of `aliases`.
pub fn find_column<'a>(headers: &'a [String], aliases: &[&str]) -> Option<&'a String> {
    headers
        .iter()
        .find(|h| aliases.contains(&normalize_header(h).as_str()))
}

/// Resolve the canonical columns of a table.
///
/// Missing `date` or `pm25` fails with a validation error that lists every
/// available header. Missing secondary pollutants are omitted.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnMap> {
    let date = find_column(headers, DATE_ALIASES);
    let pm25 = find_column(headers, Pollutant::Pm25.aliases());

    let (date, pm25) = match (date, pm25) {
        (Some(date), Some(pm25)) => (date, pm25),
        (date, pm25) => {
            let mut missing = Vec::new();
            if date.is_none() {
                missing.push(DATE_FIELD.to_string());
            }
            if pm25.is_none() {
                missing.push(Pollutant::Pm25.key().to_string());
            }
            return Err(AnalysisError::MissingColumns {
                missing,
                available: headers.to_vec(),
            });
        }
    };

    let mut pollutants = BTreeMap::new();
    pollutants.insert(Pollutant::Pm25, pm25.clone());
    for pollutant in &Pollutant::ALL[1..] {
        if let Some(header) = find_column(headers, pollutant.aliases()) {
            pollutants.insert(*pollutant, header.clone());
        }
    }

    let map = ColumnMap {
        date: date.clone(),
        pollutants,
    };
    log::info!("Resolved columns: {:?}", map.to_field_map());
    Ok(map)
}
