//! Health Check API Tests

use axum::http::StatusCode;

use crate::common::{body_json, body_string, TestApp};

/// Basic health check endpoint returns 200 OK with a status field
#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::stateless();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_some());
}

/// Liveness probe always returns 200 while the process runs
#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::stateless();

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "alive");
}

/// Metrics endpoint exposes Prometheus text with registered metric names
#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::stateless();

    // Record something so the counter families are present in the output.
    wellness_server::infrastructure::metrics::record_http_request("GET", "/health", 200, 0.001);

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("wellness_server_http_requests_total"));
}

/// Unknown routes return 404
#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = TestApp::stateless();

    let response = app.get("/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
