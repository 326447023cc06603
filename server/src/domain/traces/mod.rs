//! Trace ingestion and lookup
//!
//! - `ingest` - validate a span batch and write it atomically
//! - `query` - resolve a trace id and return its spans in time order

mod error;
mod ingest;
mod query;

pub use error::{IngestError, QueryError};
pub use ingest::TraceIngestService;
pub use query::TraceQueryService;
