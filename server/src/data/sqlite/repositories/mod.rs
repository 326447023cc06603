//! SQLite repositories
//!
//! Row types (TraceRow, SpanRow, BatchSummary) live in `crate::data::types`.

pub mod batch;
pub mod span;
pub mod trace;

pub use batch::{TraceIdMap, write_batch};
pub use span::{insert_span, list_spans_for_trace};
pub use trace::{TraceResolution, find_trace, resolve_or_create_trace};
