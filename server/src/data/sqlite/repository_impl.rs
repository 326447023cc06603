//! TraceStore trait implementation for SQLite

use std::sync::Arc;

use async_trait::async_trait;
use tracekeep::Span;

use crate::data::error::DataError;
use crate::data::traits::TraceStore;
use crate::data::types::{BatchSummary, SpanRow, TraceRow};

use super::SqliteService;
use super::repositories::{batch, span, trace};

#[async_trait]
impl TraceStore for Arc<SqliteService> {
    // ==================== Batch Operations ====================

    async fn write_batch(&self, spans: &[Span]) -> Result<BatchSummary, DataError> {
        batch::write_batch(self.pool(), spans)
            .await
            .map_err(Into::into)
    }

    // ==================== Trace Operations ====================

    async fn find_trace(&self, trace_id: &str) -> Result<Option<TraceRow>, DataError> {
        trace::find_trace(self.pool(), trace_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Span Operations ====================

    async fn list_spans(&self, trace_row_id: i64) -> Result<Vec<SpanRow>, DataError> {
        span::list_spans_for_trace(self.pool(), trace_row_id)
            .await
            .map_err(Into::into)
    }
}
