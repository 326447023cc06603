//! Data storage layer
//!
//! - `sqlite` - SQLite trace store (schema, migrations, repositories)
//! - `types` - Row types shared with the domain layer
//! - `traits` - `TraceStore`, the seam between domain and backend
//! - `error` - Unified error type

pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::TraceStore;
pub use types::{BatchSummary, SpanRow, TraceRow};
