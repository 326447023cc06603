//! Row types shared between the storage backend and the domain layer

mod traces;

pub use traces::{BatchSummary, SpanRow, TraceRow};
