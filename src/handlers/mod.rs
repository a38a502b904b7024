//! HTTP transport
//!
//! `POST /mcp` answers one JSON-RPC request body exactly like a stdio line
//! and always replies 200 with a JSON-RPC body. `/health` and `/status`
//! live in [`status`].

pub mod status;

use crate::extractor::{ExtractionResult, PostExtraction};
use crate::mcp::{JsonRpcResponse, McpServer};
use axum::extract::{FromRef, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

pub use status::{
    health_handler, status_handler, ExtractionCounts, HealthResponse, LatencyHistogram,
    LatencySummary, ServerMetrics, ServiceInfo, StatusResponse,
};

/// Extractor wrapper feeding [`ServerMetrics`]
pub struct MeteredExtractor<X> {
    inner: X,
    metrics: Arc<ServerMetrics>,
}

impl<X: PostExtraction> MeteredExtractor<X> {
    /// Wrap `inner`, recording into `metrics`
    pub fn new(inner: X, metrics: Arc<ServerMetrics>) -> Self {
        Self { inner, metrics }
    }
}

impl<X: PostExtraction> PostExtraction for MeteredExtractor<X> {
    async fn extract(&self, url: &str) -> ExtractionResult {
        let start = Instant::now();
        let result = self.inner.extract(url).await;
        self.metrics.record_extraction(start.elapsed(), result.success);
        result
    }
}

/// Shared state of the HTTP transport
pub struct AppState<X> {
    /// Protocol server behind `/mcp`
    pub server: Arc<McpServer<MeteredExtractor<X>>>,
    /// Counters behind `/status`
    pub metrics: Arc<ServerMetrics>,
}

impl<X: PostExtraction> AppState<X> {
    /// Build state around `extractor`
    pub fn new(extractor: X) -> Self {
        let metrics = Arc::new(ServerMetrics::new());
        let server = McpServer::new(MeteredExtractor::new(extractor, Arc::clone(&metrics)));
        Self {
            server: Arc::new(server),
            metrics,
        }
    }
}

impl<X> Clone for AppState<X> {
    fn clone(&self) -> Self {
        Self {
            server: Arc::clone(&self.server),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<X> FromRef<AppState<X>> for Arc<ServerMetrics> {
    fn from_ref(state: &AppState<X>) -> Self {
        Arc::clone(&state.metrics)
    }
}

/// `POST /mcp`
#[instrument(skip_all)]
pub async fn mcp_handler<X: PostExtraction + 'static>(
    State(state): State<AppState<X>>,
    body: String,
) -> Json<JsonRpcResponse> {
    Json(state.server.handle_line(&body).await)
}

/// Router with all HTTP routes
pub fn router<X: PostExtraction + 'static>(state: AppState<X>) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler::<X>))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::extraction::PostContent;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FixedExtractor;

    impl PostExtraction for FixedExtractor {
        async fn extract(&self, url: &str) -> ExtractionResult {
            if url.contains("/posts/") {
                ExtractionResult::success(
                    url,
                    PostContent {
                        text: Some("A post about Rust".to_string()),
                        ..Default::default()
                    },
                )
            } else {
                ExtractionResult::failure(url, ExtractionError::InvalidUrl)
            }
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn mcp_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = router(AppState::new(FixedExtractor));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "healthy", "service": "linkedin-post-extractor"})
        );
    }

    #[tokio::test]
    async fn test_mcp_route_counts_extractions() {
        let state = AppState::new(FixedExtractor);
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(mcp_request(
                r#"{"jsonrpc":"2.0","id":1,"method":"get_linkedin_post_text","params":{"url":"https://www.linkedin.com/posts/x"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["result"]["success"], json!(true));

        app.clone()
            .oneshot(mcp_request(
                r#"{"jsonrpc":"2.0","id":2,"method":"get_linkedin_post_text","params":{"url":"https://example.com"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(
            state.metrics.counts(),
            ExtractionCounts {
                succeeded: 1,
                failed: 1
            }
        );

        let response = app
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = body_json(response).await;
        assert_eq!(status["extractions"], json!({"succeeded": 1, "failed": 1}));
        assert_eq!(status["latency"]["samples"], json!(2));
    }

    #[tokio::test]
    async fn test_mcp_route_protocol_error_is_http_ok() {
        let app = router(AppState::new(FixedExtractor));
        let response = app.oneshot(mcp_request("{broken")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["error"]["code"], json!(-32700));
        assert_eq!(value["id"], Value::Null);
    }
}
