//! Atomic batch writes
//!
//! A batch is written inside one transaction: every trace id is resolved or
//! created and every span inserted, then the transaction commits. Any failure
//! rolls the whole batch back, so readers never observe part of a batch.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use tracekeep::Span;

use crate::data::sqlite::SqliteError;
use crate::data::types::BatchSummary;

use super::span::insert_span;
use super::trace::{TraceResolution, resolve_or_create_trace};

/// Trace id to surrogate key lookup, scoped to a single batch
///
/// Consecutive spans of one trace hit the last-seen entry without hashing.
/// Interleaved traces fall back to the map.
#[derive(Debug, Default)]
pub struct TraceIdMap {
    last: Option<(String, i64)>,
    ids: HashMap<String, i64>,
}

impl TraceIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, trace_id: &str) -> Option<i64> {
        if let Some((last_id, row_id)) = &self.last
            && last_id == trace_id
        {
            return Some(*row_id);
        }
        let row_id = *self.ids.get(trace_id)?;
        self.last = Some((trace_id.to_string(), row_id));
        Some(row_id)
    }

    pub fn insert(&mut self, trace_id: &str, row_id: i64) {
        self.ids.insert(trace_id.to_string(), row_id);
        self.last = Some((trace_id.to_string(), row_id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Write a batch of spans atomically
///
/// The first statement of the transaction is always a trace upsert, so the
/// write lock is taken before anything is read and concurrent batches queue
/// on the busy timeout rather than failing on a stale snapshot.
pub async fn write_batch(pool: &SqlitePool, spans: &[Span]) -> Result<BatchSummary, SqliteError> {
    if spans.is_empty() {
        return Ok(BatchSummary::default());
    }

    let mut tx = pool.begin().await?;

    match write_spans(&mut *tx, spans).await {
        Ok(summary) => {
            tx.commit().await?;
            tracing::debug!(
                spans = summary.spans,
                traces_created = summary.traces_created,
                traces_reused = summary.traces_reused,
                "Batch committed"
            );
            Ok(summary)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Batch rollback failed");
            }
            Err(e)
        }
    }
}

async fn write_spans(
    conn: &mut SqliteConnection,
    spans: &[Span],
) -> Result<BatchSummary, SqliteError> {
    let mut trace_ids = TraceIdMap::new();
    let mut summary = BatchSummary::default();

    for span in spans {
        let row_id = match trace_ids.get(&span.trace_id) {
            Some(row_id) => row_id,
            None => {
                let resolution =
                    resolve_or_create_trace(&mut *conn, &span.trace_id, span.timestamp).await?;
                match resolution {
                    TraceResolution::Created(_) => summary.traces_created += 1,
                    TraceResolution::Existing(_) => summary.traces_reused += 1,
                }
                trace_ids.insert(&span.trace_id, resolution.id());
                resolution.id()
            }
        };

        insert_span(&mut *conn, row_id, span).await?;
        summary.spans += 1;
    }

    Ok(summary)
}
