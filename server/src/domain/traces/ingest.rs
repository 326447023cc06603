//! Span batch ingestion
//!
//! Validates an incoming batch and hands it to the store as one atomic write.

use std::sync::Arc;

use tracekeep::Span;

use super::error::IngestError;
use crate::data::{BatchSummary, TraceStore};

#[derive(Clone)]
pub struct TraceIngestService {
    store: Arc<dyn TraceStore>,
}

impl TraceIngestService {
    pub fn new(store: Arc<dyn TraceStore>) -> Self {
        Self { store }
    }

    /// Persist a batch of spans
    ///
    /// An empty batch succeeds without touching the store. A span with an
    /// empty trace id rejects the whole batch before anything is written.
    pub async fn ingest(&self, spans: &[Span]) -> Result<BatchSummary, IngestError> {
        if spans.is_empty() {
            return Ok(BatchSummary::default());
        }

        if let Some((index, span)) = spans
            .iter()
            .enumerate()
            .find(|(_, span)| span.trace_id.is_empty())
        {
            return Err(IngestError::EmptyTraceId {
                index,
                span_id: span.span_id.clone(),
            });
        }

        Ok(self.store.write_batch(spans).await?)
    }
}
