//! Trace domain errors

use thiserror::Error;

use crate::data::DataError;

#[derive(Error, Debug)]
pub enum IngestError {
    /// The whole batch is rejected when any span lacks a trace id
    #[error("Span {index} ({span_id}) has an empty traceId")]
    EmptyTraceId { index: usize, span_id: String },

    #[error("Failed to persist spans: {0}")]
    Data(#[from] DataError),
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("trace not found for traceID {0}")]
    NotFound(String),

    #[error("Corrupt tags for span {span_id}: {source}")]
    CorruptTags {
        span_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to load trace: {0}")]
    Data(#[from] DataError),
}
