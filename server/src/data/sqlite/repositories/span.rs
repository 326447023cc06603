//! Span repository for SQLite operations

use sqlx::{SqliteConnection, SqlitePool};
use tracekeep::Span;

use crate::data::sqlite::SqliteError;
use crate::data::types::SpanRow;

/// Insert one span under an already resolved trace row
///
/// Root spans store a NULL parent, and spans without tags store NULL tags.
pub async fn insert_span(
    conn: &mut SqliteConnection,
    trace_row_id: i64,
    span: &Span,
) -> Result<i64, SqliteError> {
    let parent_id = (!span.parent_span_id.is_empty()).then_some(span.parent_span_id.as_str());
    let tags = if span.tags.is_empty() {
        None
    } else {
        Some(
            serde_json::to_string(&span.tags).map_err(|source| SqliteError::EncodeTags {
                span_id: span.span_id.clone(),
                source,
            })?,
        )
    };

    let result = sqlx::query(
        "INSERT INTO spans (trace_id, span_id, parent_id, name, duration, timestamp, tags) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(trace_row_id)
    .bind(&span.span_id)
    .bind(parent_id)
    .bind(&span.name)
    .bind(span.duration)
    .bind(span.timestamp)
    .bind(tags)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List spans of a trace, oldest first
///
/// Spans sharing a timestamp come back in insertion order.
pub async fn list_spans_for_trace(
    pool: &SqlitePool,
    trace_row_id: i64,
) -> Result<Vec<SpanRow>, SqliteError> {
    let rows = sqlx::query_as::<
        _,
        (
            i64,
            String,
            Option<String>,
            String,
            i64,
            i64,
            Option<String>,
        ),
    >(
        "SELECT id, span_id, parent_id, name, duration, timestamp, tags FROM spans WHERE trace_id = ? ORDER BY timestamp ASC, id ASC",
    )
    .bind(trace_row_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, span_id, parent_id, name, duration, timestamp, tags)| SpanRow {
                id,
                span_id,
                parent_id,
                name,
                duration,
                timestamp,
                tags,
            },
        )
        .collect())
}
