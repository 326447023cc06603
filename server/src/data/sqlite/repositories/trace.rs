//! Trace repository for SQLite operations

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::TraceRow;

/// How a trace id was resolved to its surrogate key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceResolution {
    Created(i64),
    Existing(i64),
}

impl TraceResolution {
    pub fn id(self) -> i64 {
        match self {
            Self::Created(id) | Self::Existing(id) => id,
        }
    }
}

/// Resolve a trace id to its surrogate key, inserting the trace row if needed
///
/// Upsert-then-fetch: the insert is a no-op when the trace id already exists
/// (committed by an earlier or concurrent batch), in which case the existing
/// row id is read back. `timestamp` only applies to a newly created row.
pub async fn resolve_or_create_trace(
    conn: &mut SqliteConnection,
    trace_id: &str,
    timestamp: i64,
) -> Result<TraceResolution, SqliteError> {
    let result = sqlx::query(
        "INSERT INTO traces (trace_id, timestamp) VALUES (?, ?) ON CONFLICT(trace_id) DO NOTHING",
    )
    .bind(trace_id)
    .bind(timestamp)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(TraceResolution::Created(result.last_insert_rowid()));
    }

    let id: i64 = sqlx::query_scalar("SELECT id FROM traces WHERE trace_id = ?")
        .bind(trace_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(TraceResolution::Existing(id))
}

/// Find a trace by its external id
pub async fn find_trace(pool: &SqlitePool, trace_id: &str) -> Result<Option<TraceRow>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, i64)>(
        "SELECT id, trace_id, timestamp FROM traces WHERE trace_id = ?",
    )
    .bind(trace_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, trace_id, timestamp)| TraceRow {
        id,
        trace_id,
        timestamp,
    }))
}
