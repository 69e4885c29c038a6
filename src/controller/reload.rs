//! Live-reload signal for downstream services
//!
//! Prometheus and Alertmanager both re-read their configuration when they
//! receive `POST /-/reload`. The response status is logged but not acted on:
//! any answer counts as delivered, only transport failures are errors.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Reload request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Build the reload endpoint URL for a service at `server:port`
pub fn reload_url(server: &str, port: u16) -> String {
    format!("http://{}:{}/-/reload", server, port)
}

/// Trait for triggering a configuration reload
///
/// Production code uses `HttpReloadNotifier`; tests use `MockReloadNotifier`
/// which records the URLs it was asked to hit.
#[async_trait]
pub trait ReloadNotifier: Send + Sync {
    async fn reload(&self, url: &str) -> Result<(), ReloadError>;
}

/// Sends an empty JSON POST to the reload endpoint
pub struct HttpReloadNotifier {
    client: reqwest::Client,
}

impl HttpReloadNotifier {
    /// Each reload call is bounded by `timeout`; there are no retries.
    pub fn new(timeout: Duration) -> Result<Self, ReloadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReloadError::Client)?;
        Ok(HttpReloadNotifier { client })
    }
}

#[async_trait]
impl ReloadNotifier for HttpReloadNotifier {
    async fn reload(&self, url: &str) -> Result<(), ReloadError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(Vec::<u8>::new())
            .send()
            .await
            .map_err(|source| ReloadError::Request {
                url: url.to_string(),
                source,
            })?;

        // Body is dropped unread
        let status = response.status();
        if status.is_success() {
            info!(url = %url, status = %status, "Reload triggered");
        } else {
            warn!(url = %url, status = %status, "Reload endpoint answered with non-success status");
        }

        Ok(())
    }
}

/// Mock notifier for testing - stores requested URLs in memory
#[cfg(test)]
pub struct MockReloadNotifier {
    urls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl Default for MockReloadNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl MockReloadNotifier {
    pub fn new() -> Self {
        MockReloadNotifier {
            urls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn reloaded_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
#[allow(clippy::unwrap_used)]
impl ReloadNotifier for MockReloadNotifier {
    async fn reload(&self, url: &str) -> Result<(), ReloadError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "reload_test.rs"]
mod tests;
