//! Tests for health and metrics endpoints

use super::*;
use std::time::Duration;

/// Start the health router on an ephemeral port, returning its base URL
async fn start_health_server(
    readiness: ReadinessState,
) -> (String, ShutdownController, tokio::task::JoinHandle<std::io::Result<()>>) {
    let metrics = create_metrics().expect("metrics registry");
    let app = health_router(readiness, metrics);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let (controller, signal) = shutdown_channel();
    let handle = tokio::spawn(serve(listener, app, signal));

    (base, controller, handle)
}

async fn status_of(url: &str) -> u16 {
    reqwest::Client::new()
        .get(url)
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to connect to health server")
        .status()
        .as_u16()
}

#[tokio::test]
async fn test_healthz_returns_200() {
    let (base, shutdown, handle) = start_health_server(ReadinessState::new()).await;

    assert_eq!(status_of(&format!("{}/healthz", base)).await, 200);

    shutdown.shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_readyz_follows_readiness_state() {
    // ARRANGE: not ready by default
    let readiness = ReadinessState::new();
    let (base, shutdown, handle) = start_health_server(readiness.clone()).await;
    let url = format!("{}/readyz", base);

    // ASSERT: 503 before, 200 after set_ready, 503 again once draining
    assert_eq!(status_of(&url).await, 503);
    readiness.set_ready();
    assert_eq!(status_of(&url).await, 200);
    readiness.set_not_ready();
    assert_eq!(status_of(&url).await, 503);

    shutdown.shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_metrics_endpoint_serves_text_format() {
    let (base, shutdown, handle) = start_health_server(ReadinessState::new()).await;

    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    drop(response);
    assert!(content_type.starts_with("text/plain"));

    shutdown.shutdown();
    handle.await.unwrap().unwrap();
}

#[test]
fn test_readiness_state_clones_share_flag() {
    let state = ReadinessState::new();
    let cloned = state.clone();

    assert!(!cloned.is_ready());
    state.set_ready();
    assert!(cloned.is_ready());
}
