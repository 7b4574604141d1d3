//! `columns` subcommand.

use crate::analyze::{finish, read_dataset};
use aqf_data::{resolve_columns, RawTable};
use aqf_utils::error::Result;
use serde_json::{json, Value};
use std::path::Path;

/// Header mapping of a CSV document, as a JSON body.
pub fn describe_columns(csv: &str) -> Result<Value> {
    let table = RawTable::from_csv_str(csv)?;
    let columns = resolve_columns(table.headers())?;
    let unmatched: Vec<&String> = table
        .headers()
        .iter()
        .filter(|h| *h != &columns.date && !columns.pollutants.values().any(|c| c == *h))
        .collect();
    Ok(json!({
        "status": "success",
        "columns": columns.to_field_map(),
        "unmatched": unmatched,
        "rows": table.len(),
    }))
}

pub fn run_columns(dataset: &Path) -> anyhow::Result<()> {
    let result = read_dataset(dataset).and_then(|csv| describe_columns(&csv));
    finish(result, None)
}
