//! Domain logic
//!
//! - `traces` - span batch ingestion and trace queries

pub mod traces;

pub use traces::{TraceIngestService, TraceQueryService};
