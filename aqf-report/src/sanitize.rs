//! Final pass that guarantees every numeric leaf of a report is finite.
//!
//! The report is serialized to a JSON value, lifted into [`Node`], scrubbed
//! and lowered again. serde_json already turns NaN and infinities into
//! `null`, so `null` leaves are treated as missing numbers and replaced too.

use aqf_utils::error::{AnalysisError, Result};
use aqf_utils::stats::DEFAULT;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// A response tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl Node {
    /// Replace every non-finite float and every null with [`DEFAULT`].
    /// Text, booleans and integers pass through unchanged.
    pub fn sanitize(self) -> Node {
        match self {
            Node::Null => Node::Float(DEFAULT),
            Node::Float(f) if !f.is_finite() => Node::Float(DEFAULT),
            Node::Array(items) => Node::Array(items.into_iter().map(Node::sanitize).collect()),
            Node::Object(fields) => Node::Object(
                fields
                    .into_iter()
                    .map(|(key, node)| (key, node.sanitize()))
                    .collect(),
            ),
            leaf => leaf,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Node::Null => false,
            Node::Float(f) => f.is_finite(),
            Node::Array(items) => items.iter().all(Node::is_finite),
            Node::Object(fields) => fields.iter().all(|(_, node)| node.is_finite()),
            _ => true,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Integer(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Node::Text(s),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(fields) => Node::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(b),
            Node::Integer(i) => Value::from(i),
            Node::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Node::Text(s) => Value::String(s),
            Node::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, node)| (key, Value::from(node)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

pub fn sanitize_value(value: Value) -> Value {
    Value::from(Node::from(value).sanitize())
}

/// Serialize a fully built report and sanitize it.
pub fn to_sanitized_json<T: Serialize>(report: &T) -> Result<Value> {
    let value = serde_json::to_value(report)
        .map_err(|e| AnalysisError::Internal(format!("failed to serialize report: {}", e)))?;
    let node = Node::from(value);
    if !node.is_finite() {
        log::debug!("Report contains non-finite values; substituting {}", DEFAULT);
    }
    Ok(Value::from(node.sanitize()))
}
