//! HTTP server for the REST API plus health and metrics endpoints
//!
//! Resource routes live under `/v1/alerts` and `/v1/receivers`; operational
//! endpoints are `/healthz`, `/readyz` and `/metrics`. The server drains
//! in-flight requests when the shutdown signal fires.

pub mod api;
mod health;
pub mod metrics;
pub mod shutdown;

pub use api::resource_router;
pub use health::{health_router, ReadinessState};
pub use metrics::{create_metrics, ServiceMetrics, SharedMetrics};
pub use shutdown::{shutdown_channel, wait_for_signal, ShutdownController, ShutdownSignal};

use crate::controller::ResourceController;
use crate::model::{Alert, Receiver};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Full application router: both resources plus health and metrics
pub fn build_router(
    alerts: Arc<ResourceController<Alert>>,
    receivers: Arc<ResourceController<Receiver>>,
    readiness: ReadinessState,
    metrics: SharedMetrics,
) -> Router {
    Router::new()
        .merge(resource_router(alerts, metrics.clone()))
        .merge(resource_router(receivers, metrics.clone()))
        .merge(health_router(readiness, metrics))
}

/// Serve `app` on `listener` until `shutdown` fires
///
/// In-flight requests finish before this returns.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: ShutdownSignal,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(address = %addr, "HTTP server listening");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
