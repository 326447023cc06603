//! Attribute normalization
//!
//! OpenTelemetry attributes are typed (scalars and homogeneous arrays).
//! Tags are plain strings, so every value is rendered exactly once here:
//!
//! | Value          | Rendered as                 |
//! |----------------|-----------------------------|
//! | `bool`         | `true` / `false`            |
//! | `i64`, `f64`   | decimal                     |
//! | `string`       | verbatim                    |
//! | arrays         | JSON array, e.g. `[1,2,3]`  |

use opentelemetry::{Array, KeyValue, Value};
use serde::Serialize;

/// Closed set of attribute value kinds a span can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    BoolArray(Vec<bool>),
    I64Array(Vec<i64>),
    F64Array(Vec<f64>),
    StringArray(Vec<String>),
}

impl From<&Value> for AttributeValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::I64(i) => Self::I64(*i),
            Value::F64(f) => Self::F64(*f),
            Value::String(s) => Self::String(s.as_str().to_string()),
            Value::Array(Array::Bool(v)) => Self::BoolArray(v.clone()),
            Value::Array(Array::I64(v)) => Self::I64Array(v.clone()),
            Value::Array(Array::F64(v)) => Self::F64Array(v.clone()),
            Value::Array(Array::String(v)) => {
                Self::StringArray(v.iter().map(|s| s.as_str().to_string()).collect())
            }
            // Value kinds added by newer OpenTelemetry releases
            other => Self::String(other.to_string()),
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl AttributeValue {
    /// Render the value as a tag string.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::I64(i) => i.to_string(),
            Self::F64(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::BoolArray(v) => render_array(v),
            Self::I64Array(v) => render_array(v),
            Self::F64Array(v) => render_array(v),
            Self::StringArray(v) => render_array(v),
        }
    }
}

/// Serialize an array as a JSON literal, degrading to an empty string.
fn render_array<T: Serialize>(values: &[T]) -> String {
    serde_json::to_string(values).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize array attribute, using empty value");
        String::new()
    })
}

/// Convert a key and typed value into a tag pair.
pub fn normalize(key: &str, value: &AttributeValue) -> (String, String) {
    (key.to_string(), value.render())
}

/// Convert an OpenTelemetry attribute into a tag pair.
pub fn normalize_key_value(kv: &KeyValue) -> (String, String) {
    normalize(kv.key.as_str(), &AttributeValue::from(&kv.value))
}
