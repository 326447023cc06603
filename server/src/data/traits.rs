//! Repository traits for database backends
//!
//! The domain layer talks to storage only through these traits.

use async_trait::async_trait;
use tracekeep::Span;

use crate::data::error::DataError;
use crate::data::types::{BatchSummary, SpanRow, TraceRow};

// ============================================================================
// Trace Store Trait
// ============================================================================

/// Durable storage for traces and their spans
///
/// Implemented by the SQLite backend.
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Persist a batch of spans as one atomic unit
    ///
    /// Each distinct trace id resolves to an existing trace row or gets a new
    /// one. On error nothing from the batch is visible.
    async fn write_batch(&self, spans: &[Span]) -> Result<BatchSummary, DataError>;

    /// Look up a trace by its external id
    async fn find_trace(&self, trace_id: &str) -> Result<Option<TraceRow>, DataError>;

    /// List all spans of a trace ordered by timestamp, ties in insertion order
    async fn list_spans(&self, trace_row_id: i64) -> Result<Vec<SpanRow>, DataError>;
}
