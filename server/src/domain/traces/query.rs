//! Trace lookup

use std::sync::Arc;

use tracekeep::{Span, Tags};

use super::error::QueryError;
use crate::data::{SpanRow, TraceStore};

#[derive(Clone)]
pub struct TraceQueryService {
    store: Arc<dyn TraceStore>,
}

impl TraceQueryService {
    pub fn new(store: Arc<dyn TraceStore>) -> Self {
        Self { store }
    }

    /// All spans of a trace, oldest first
    ///
    /// Unknown trace ids are `NotFound` rather than an empty list.
    pub async fn get_trace(&self, trace_id: &str) -> Result<Vec<Span>, QueryError> {
        let trace = self
            .store
            .find_trace(trace_id)
            .await?
            .ok_or_else(|| QueryError::NotFound(trace_id.to_string()))?;

        let rows = self.store.list_spans(trace.id).await?;
        rows.into_iter()
            .map(|row| span_from_row(&trace.trace_id, row))
            .collect()
    }
}

fn span_from_row(trace_id: &str, row: SpanRow) -> Result<Span, QueryError> {
    let tags = match row.tags.as_deref() {
        None => Tags::new(),
        Some(blob) => {
            serde_json::from_str(blob).map_err(|source| QueryError::CorruptTags {
                span_id: row.span_id.clone(),
                source,
            })?
        }
    };

    Ok(Span {
        trace_id: trace_id.to_string(),
        span_id: row.span_id,
        parent_span_id: row.parent_id.unwrap_or_default(),
        name: row.name,
        timestamp: row.timestamp,
        duration: row.duration,
        tags,
    })
}
