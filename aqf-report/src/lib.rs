//! Analysis pipeline that turns an uploaded CSV into the aggregated JSON
//! report: forecast, AQI breakdown, classification, statistics and model
//! evaluation.

pub mod config;
pub mod pipeline;
pub mod response;
pub mod sanitize;
pub mod statistics;

pub use config::{AnalysisConfig, AnalysisMode};
pub use pipeline::Analyzer;
pub use response::{FullResponse, QuickResponse, ReferenceImage};
pub use sanitize::{sanitize_value, to_sanitized_json, Node};
pub use statistics::{summarize, Statistics, TrendDirection};
