//! Trace query endpoint
//!
//! `GET /api/v2/traces?traceID=<id>` returns the spans of one trace,
//! oldest first.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracekeep::Span;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::types::ApiError;
use crate::domain::traces::{QueryError, TraceQueryService};

#[derive(Clone)]
pub struct TracesApiState {
    pub query: TraceQueryService,
}

/// Query parameters for trace lookup
#[derive(Debug, Deserialize, Validate)]
pub struct TraceQuery {
    #[serde(rename = "traceID", default)]
    #[validate(length(min = 1, max = 256, message = "traceID must be 1-256 characters"))]
    pub trace_id: String,
}

pub fn routes(query: TraceQueryService) -> Router<()> {
    let state = TracesApiState { query };

    Router::new()
        .route("/api/v2/traces", get(get_trace))
        .with_state(state)
}

async fn get_trace(
    State(state): State<TracesApiState>,
    params: ValidatedQuery<TraceQuery>,
) -> Result<Json<Vec<Span>>, ApiError> {
    let spans = state
        .query
        .get_trace(&params.trace_id)
        .await
        .map_err(|e| match e {
            QueryError::NotFound(_) => ApiError::not_found("TRACE_NOT_FOUND", e.to_string()),
            QueryError::CorruptTags { .. } => {
                tracing::error!(error = %e, trace_id = %params.trace_id, "Stored span is unreadable");
                ApiError::internal("Stored span data is corrupt")
            }
            QueryError::Data(e) => ApiError::from_data(e),
        })?;

    Ok(Json(spans))
}
