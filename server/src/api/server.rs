//! API server initialization

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::routes::{health, spans, traces};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::domain::{TraceIngestService, TraceQueryService};

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(
            host.parse()
                .with_context(|| format!("Invalid server host: {}", host))?,
            port,
        );

        let router = router(
            app.ingest.clone(),
            app.query.clone(),
            app.config.ingest.max_body_bytes,
        );

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(%addr, "Listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Build the HTTP router
///
/// Span ingestion gets its own (larger) body limit; the limit applies to the
/// decompressed body.
pub fn router(
    ingest: TraceIngestService,
    query: TraceQueryService,
    ingest_body_limit: usize,
) -> Router {
    let span_routes = spans::routes(ingest).layer(DefaultBodyLimit::max(ingest_body_limit));

    Router::new()
        .route("/api/v1/health", get(health::health))
        .merge(span_routes)
        .merge(traces::routes(query))
        .fallback(middleware::handle_404)
        .layer(RequestDecompressionLayer::new())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::data::{SqliteService, TraceStore};

    async fn test_router(ingest_body_limit: usize) -> Router {
        let database = Arc::new(SqliteService::in_memory().await);
        let store: Arc<dyn TraceStore> = Arc::new(database);
        router(
            TraceIngestService::new(Arc::clone(&store)),
            TraceQueryService::new(store),
            ingest_body_limit,
        )
    }

    fn post_spans(body: String) -> Request<Body> {
        Request::post("/api/v2/spans")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_then_query() {
        let app = test_router(1024 * 1024).await;
        let body = serde_json::json!([
            {"traceId": "t1", "id": "b", "parentId": "a", "name": "child", "timestamp": 20, "duration": 1},
            {"traceId": "t1", "id": "a", "name": "root", "timestamp": 10, "duration": 15, "tags": {"service.name": "api"}}
        ]);

        let resp = app
            .clone()
            .oneshot(post_spans(body.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);

        let req = Request::get("/api/v2/traces?traceID=t1")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json[0]["id"], "a");
        assert_eq!(json[0]["tags"]["service.name"], "api");
        assert!(json[0].get("parentId").is_none());
        assert_eq!(json[1]["parentId"], "a");
    }

    #[tokio::test]
    async fn test_ingest_body_limit() {
        let app = test_router(64).await;
        let body = serde_json::json!([
            {"traceId": "t1", "id": "a", "name": "x".repeat(128), "timestamp": 1, "duration": 1}
        ]);

        let resp = app.oneshot(post_spans(body.to_string())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = test_router(1024).await;
        let req = Request::get("/api/v1/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_404() {
        let app = test_router(1024).await;
        let req = Request::get("/api/v1/spans").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
