//! Common Test Utilities
//!
//! Shared helpers and test infrastructure.

use axum::{body::Body, http::Request, response::Response, routing::get, Router};
use tower::ServiceExt;

use wellness_server::infrastructure::metrics;
use wellness_server::presentation::http::handlers;

/// Test application wrapping a router.
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    /// Build an app exposing only the routes that need no database or
    /// Redis connection. Full-stack tests require live backing services
    /// and live elsewhere.
    pub fn stateless() -> Self {
        let router = Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/health/live", get(handlers::health::liveness))
            .route("/metrics", get(|| async { metrics::gather_metrics() }));

        Self { router }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as a string
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
