//! JSON input for rows and update specs.
//!
//! Scalars map to bound values; an object of the form `{"$raw": "<sql>"}`
//! is a raw expression inlined into the statement.

use oxide_upsert::{raw, Row, SqlValue, UpdateEntry, UpdateSpec, Value};
use serde_json::Value as Json;
use thiserror::Error;

/// Key marking a raw SQL expression.
pub const RAW_KEY: &str = "$raw";

/// Errors from parsing command-line JSON.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but has the wrong shape.
    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    /// A JSON integer does not fit in a signed 64-bit value.
    #[error("integer {0} is out of range for a 64-bit signed value")]
    IntegerOutOfRange(String),
}

/// Result type alias for input parsing.
pub type Result<T> = std::result::Result<T, InputError>;

/// Parses rows from a JSON object or an array of objects.
pub fn parse_rows(input: &str) -> Result<Vec<Row>> {
    match serde_json::from_str(input)? {
        Json::Array(items) => items.into_iter().map(parse_row).collect(),
        object @ Json::Object(_) => Ok(vec![parse_row(object)?]),
        other => Err(shape("an object or an array of objects", &other)),
    }
}

/// Parses an update spec.
///
/// An array mixes column names (copied from the inserted row) and objects
/// (explicit assignments); an object is a list of assignments. Entry order
/// follows the input.
pub fn parse_update(input: &str) -> Result<UpdateSpec> {
    match serde_json::from_str(input)? {
        Json::Array(items) => {
            let mut update = UpdateSpec::new();
            for item in items {
                match item {
                    Json::String(column) => update.push(UpdateEntry::Column(column)),
                    Json::Object(assignments) => {
                        for (column, value) in assignments {
                            update.push(UpdateEntry::Assign(column, parse_value(value)?));
                        }
                    }
                    other => return Err(shape("a column name or an object", &other)),
                }
            }
            Ok(update)
        }
        Json::Object(assignments) => assignments
            .into_iter()
            .map(|(column, value)| Ok(UpdateEntry::Assign(column, parse_value(value)?)))
            .collect(),
        other => Err(shape("an object or an array", &other)),
    }
}

fn parse_row(json: Json) -> Result<Row> {
    match json {
        Json::Object(columns) => columns
            .into_iter()
            .map(|(column, value)| Ok((column, parse_value(value)?)))
            .collect(),
        other => Err(shape("an object", &other)),
    }
}

fn parse_value(json: Json) -> Result<Value> {
    let value = match json {
        Json::Null => SqlValue::Null,
        Json::Bool(b) => SqlValue::Bool(b),
        Json::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => SqlValue::Int(i),
            (None, Some(f)) if n.is_f64() => SqlValue::Float(f),
            _ => return Err(InputError::IntegerOutOfRange(n.to_string())),
        },
        Json::String(s) => SqlValue::Text(s),
        Json::Object(mut object) => {
            return match (object.remove(RAW_KEY), object.is_empty()) {
                (Some(Json::String(sql)), true) => Ok(Value::from(raw(sql))),
                _ => Err(InputError::Shape {
                    expected: "a scalar or {\"$raw\": \"<sql>\"}",
                    found: "object",
                }),
            };
        }
        other @ Json::Array(_) => return Err(shape("a scalar", &other)),
    };

    Ok(Value::from(value))
}

fn shape(expected: &'static str, found: &Json) -> InputError {
    let found = match found {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    };
    InputError::Shape { expected, found }
}
