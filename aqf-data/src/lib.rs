//! Core types and dataset handling for air-quality time series.
//!
//! A request's CSV upload flows through this crate in three steps:
//! [`table::RawTable`] holds the untyped cells, [`columns::resolve_columns`]
//! maps loosely-named headers onto canonical fields, and
//! [`series::normalize`] turns one column into a sorted [`series::ObservationSeries`].

pub mod columns;
pub mod concentrations;
pub mod date_range;
pub mod pollutant;
pub mod series;
pub mod table;

pub use columns::{resolve_columns, ColumnMap};
pub use pollutant::Pollutant;
pub use series::{normalize, Observation, ObservationSeries};
pub use table::RawTable;
