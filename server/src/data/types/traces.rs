//! Trace and span rows

use serde::Serialize;

// ============================================================================
// Trace types
// ============================================================================

/// Trace row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRow {
    /// Surrogate key referenced by `spans.trace_id`
    pub id: i64,
    /// External trace identifier
    pub trace_id: String,
    /// Timestamp of the first span seen for this trace
    pub timestamp: i64,
}

// ============================================================================
// Span types
// ============================================================================

/// Span row from database
///
/// `tags` is the raw JSON blob; decoding it is left to the caller so a
/// corrupt blob can be reported against the span it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanRow {
    pub id: i64,
    pub span_id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub duration: i64,
    pub timestamp: i64,
    pub tags: Option<String>,
}

// ============================================================================
// Batch types
// ============================================================================

/// Outcome of one committed batch write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Span rows inserted
    pub spans: usize,
    /// Distinct trace ids that got a new trace row
    pub traces_created: usize,
    /// Distinct trace ids that resolved to an existing trace row
    pub traces_reused: usize,
}
