//! HTTP endpoint serving the collected metrics
//!
//! Each scrape of the metrics path runs one full poll of the appliance. Nothing is
//! cached between scrapes.

use crate::error::Result;
use crate::monitoring::{prometheus, MetricsCollector};
use axum::{extract::State, http::header, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Create the exporter router
pub fn router(collector: Arc<MetricsCollector>, metrics_path: &str) -> Router {
    Router::new()
        .route(metrics_path, get(metrics))
        .route("/health", get(health))
        .with_state(collector)
}

/// Bind `listen` and serve until Ctrl-C
pub async fn serve(listen: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!("Exporter listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Exporter stopped");
    Ok(())
}

async fn metrics(State(collector): State<Arc<MetricsCollector>>) -> impl IntoResponse {
    let body = collector.render().await;
    ([(header::CONTENT_TYPE, prometheus::CONTENT_TYPE)], body)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
