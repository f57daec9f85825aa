//! HTTP endpoint tests

mod common;

use alarm_monitor_exporter::monitoring::{CollectorConfig, MetricsCollector};
use alarm_monitor_exporter::server;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use common::test_fixtures::test_client;
use common::MockAppliance;
use std::sync::Arc;
use tower::ServiceExt;

async fn collector_for(appliance: &MockAppliance) -> Arc<MetricsCollector> {
    Arc::new(MetricsCollector::new(
        Arc::new(test_client(&appliance.url())),
        CollectorConfig::default(),
    ))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let appliance = MockAppliance::start_with_defaults().await;
    let app = server::router(collector_for(&appliance).await, "/metrics");

    let (status, content_type, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );
    assert!(body.contains("# TYPE alarm_monitor_input_status gauge"));
    assert!(body.contains("alarm_monitor_up{endpoint=\"mqtt\"} 1"));
}

#[tokio::test]
async fn test_custom_metrics_path() {
    let appliance = MockAppliance::start_with_defaults().await;
    let app = server::router(collector_for(&appliance).await, "/prometheus");

    let (status, _, body) = get(app.clone(), "/prometheus").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alarm_monitor_cloud_status"));

    let (status, _, _) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let appliance = MockAppliance::start().await;
    let app = server::router(collector_for(&appliance).await, "/metrics");

    let (status, _, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_metrics_with_unreachable_appliance() {
    let appliance = MockAppliance::start().await;
    let app = server::router(collector_for(&appliance).await, "/metrics");

    // Nothing is mounted, so every endpoint answers 404
    let (status, _, body) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alarm_monitor_up{endpoint=\"input\"} 0"));
    assert!(body.contains("alarm_monitor_up{endpoint=\"cloud\"} 0"));
}
