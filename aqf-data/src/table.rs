//! Untyped tabular view of an uploaded CSV.

use aqf_utils::error::{AnalysisError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

/// Header row plus raw string cells, exactly as uploaded (headers trimmed).
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    /// Parse CSV text with a header row.
    ///
    /// Rows may be ragged; missing trailing cells read as empty. A file with
    /// no header row at all is a validation failure.
    pub fn from_csv_str(csv_data: &str) -> Result<RawTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(csv_data.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| AnalysisError::Csv(e.to_string()))?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(AnalysisError::Csv("missing header row".to_string()));
        }

        let rows = rdr
            .records()
            .collect::<std::result::Result<Vec<StringRecord>, _>>()
            .map_err(|e| AnalysisError::Csv(e.to_string()))?;

        log::debug!(
            "Loaded CSV table with {} columns and {} rows",
            headers.len(),
            rows.len()
        );
        Ok(RawTable { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cells of one column, in file order. Ragged rows yield "".
    pub fn column<'a>(&'a self, index: usize) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |r| r.get(index).unwrap_or(""))
    }
}
