//! Canonical span record
//!
//! The JSON shape is the wire contract between exporters and the ingestion
//! endpoint, and is also what the trace query endpoint returns:
//!
//! ```json
//! {"traceId":"…","id":"…","parentId":"…","name":"GET /users","timestamp":1700000000000,"duration":12,"tags":{"http.method":"GET"}}
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Span tags: string keys to string values
pub type Tags = HashMap<String, String>;

/// One observed span in its storage-friendly shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub trace_id: String,
    #[serde(rename = "id")]
    pub span_id: String,
    /// Empty for root spans
    #[serde(
        rename = "parentId",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub parent_span_id: String,
    pub name: String,
    /// Start time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Elapsed milliseconds. Negative only when the producer reported an
    /// end time before the start time.
    pub duration: i64,
    #[serde(default)]
    pub tags: Tags,
}

impl Span {
    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_empty()
    }
}
