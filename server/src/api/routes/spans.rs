//! Span ingestion endpoint
//!
//! `POST /api/v2/spans` with a JSON array of spans. Replies `202 Accepted`
//! once the whole batch is committed.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tracekeep::Span;

use crate::api::types::ApiError;
use crate::domain::traces::{IngestError, TraceIngestService};

pub const INGEST_ACCEPTED_BODY: &str = "Traces received successfully";

#[derive(Clone)]
pub struct SpansApiState {
    pub ingest: TraceIngestService,
}

pub fn routes(ingest: TraceIngestService) -> Router<()> {
    let state = SpansApiState { ingest };

    Router::new()
        .route(
            "/api/v2/spans",
            post(ingest_spans).fallback(method_not_allowed),
        )
        .with_state(state)
}

async fn ingest_spans(
    State(state): State<SpansApiState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let spans: Vec<Span> = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, bytes = body.len(), "Rejected undecodable span batch");
        ApiError::bad_request("DECODE_ERROR", format!("Error decoding traces: {}", e))
    })?;

    let summary = state.ingest.ingest(&spans).await.map_err(|e| match e {
        IngestError::EmptyTraceId { .. } => {
            tracing::debug!(error = %e, "Rejected span batch");
            ApiError::bad_request("EMPTY_TRACE_ID", e.to_string())
        }
        IngestError::Data(e) => ApiError::from_data(e),
    })?;

    tracing::debug!(
        spans = summary.spans,
        traces_created = summary.traces_created,
        traces_reused = summary.traces_reused,
        "Span batch ingested"
    );

    Ok((StatusCode::ACCEPTED, INGEST_ACCEPTED_BODY))
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::method_not_allowed(&method)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::data::{SqliteService, TraceStore};

    async fn setup() -> (Arc<SqliteService>, Router) {
        let database = Arc::new(SqliteService::in_memory().await);
        let store: Arc<dyn TraceStore> = Arc::new(Arc::clone(&database));
        (database, routes(TraceIngestService::new(store)))
    }

    fn post_spans(body: impl Into<Body>) -> Request<Body> {
        Request::post("/api/v2/spans")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn span_count(database: &SqliteService) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM spans")
            .fetch_one(database.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_accepts_batch() {
        let (database, app) = setup().await;
        let body = serde_json::json!([
            {"traceId": "t1", "id": "a", "name": "root", "timestamp": 10, "duration": 5, "tags": {"k": "v"}},
            {"traceId": "t1", "id": "b", "parentId": "a", "name": "child", "timestamp": 11, "duration": 2}
        ]);

        let resp = app.oneshot(post_spans(body.to_string())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(body_text(resp).await, INGEST_ACCEPTED_BODY);
        assert_eq!(span_count(&database).await, 2);
    }

    #[tokio::test]
    async fn test_ingest_empty_array() {
        let (database, app) = setup().await;
        let resp = app.oneshot(post_spans("[]")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(span_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_ingest_rejects_malformed_json() {
        let (database, app) = setup().await;
        let resp = app.oneshot(post_spans("{not json")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["code"], "DECODE_ERROR");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("Error decoding traces:")
        );
        assert_eq!(span_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_trace_id() {
        let (database, app) = setup().await;
        let body = serde_json::json!([
            {"traceId": "t1", "id": "a", "name": "ok", "timestamp": 1, "duration": 1},
            {"traceId": "", "id": "b", "name": "bad", "timestamp": 2, "duration": 1}
        ]);

        let resp = app.oneshot(post_spans(body.to_string())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["code"], "EMPTY_TRACE_ID");
        assert_eq!(span_count(&database).await, 0);
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        let (_, app) = setup().await;
        let req = Request::get("/api/v2/spans").body(Body::empty()).unwrap();

        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["message"], "Method GET not allowed");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let (database, app) = setup().await;
        database.close().await;

        let body = serde_json::json!([
            {"traceId": "t1", "id": "a", "name": "x", "timestamp": 1, "duration": 1}
        ]);
        let resp = app.oneshot(post_spans(body.to_string())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
