//! Unified error type for data layer
//!
//! Backend-specific errors are converted into `DataError` at the repository
//! trait boundary.

use thiserror::Error;

use crate::data::sqlite::SqliteError;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[source] sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Data could not be encoded for storage
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl DataError {
    /// Create a SQLite error with preserved context
    pub fn from_sqlite(e: sqlx::Error) -> Self {
        Self::Sqlite(e)
    }

    /// Create a migration failed error
    pub fn migration_failed(backend: &'static str, version: i32, name: &str, error: &str) -> Self {
        Self::MigrationFailed {
            backend,
            version,
            name: name.to_string(),
            error: error.to_string(),
        }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::MigrationFailed { backend, .. } => *backend,
            Self::Encode(_) => "sqlite",
        }
    }
}

impl From<SqliteError> for DataError {
    fn from(e: SqliteError) -> Self {
        match e {
            SqliteError::Database(e) => Self::from_sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::migration_failed("sqlite", version, &name, &error),
            e @ SqliteError::EncodeTags { .. } => Self::Encode(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = DataError::migration_failed("sqlite", 2, "add_span_order_index", "syntax error");
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_span_order_index) failed on sqlite: syntax error"
        );
    }

    #[test]
    fn test_backend_method() {
        assert_eq!(DataError::from_sqlite(sqlx::Error::PoolClosed).backend(), "sqlite");
        assert_eq!(
            DataError::migration_failed("sqlite", 1, "test", "error").backend(),
            "sqlite"
        );
        assert_eq!(DataError::Encode("bad".into()).backend(), "sqlite");
    }

    #[test]
    fn test_sqlite_error_keeps_source() {
        use std::error::Error as _;

        let err = DataError::from_sqlite(sqlx::Error::PoolClosed);
        let source = err.source().expect("sqlx error should be the source");
        assert_eq!(source.to_string(), sqlx::Error::PoolClosed.to_string());
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::from_sqlite(sqlx::Error::PoolTimedOut).is_transient());
        assert!(DataError::from_sqlite(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::from_sqlite(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::migration_failed("sqlite", 1, "test", "error").is_transient());
    }

    #[test]
    fn test_from_sqlite_error() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 3,
            name: "x".to_string(),
            error: "boom".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            DataError::MigrationFailed {
                backend: "sqlite",
                version: 3,
                ..
            }
        ));

        let err: DataError = SqliteError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, DataError::Sqlite(sqlx::Error::RowNotFound)));
    }
}
