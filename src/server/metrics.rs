//! Prometheus metrics for the REST API
//!
//! - `piab_http_requests_total{resource,operation,status}`
//! - `piab_generate_duration_seconds{resource}`
//! - `piab_reloads_total{resource,outcome}`

use axum::http::StatusCode;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub type SharedMetrics = Arc<ServiceMetrics>;

pub struct ServiceMetrics {
    registry: Registry,
    http_requests: IntCounterVec,
    generate_duration: HistogramVec,
    reloads: IntCounterVec,
}

/// Build the metrics registry with all collectors registered
pub fn create_metrics() -> Result<SharedMetrics, prometheus::Error> {
    let registry = Registry::new();

    let http_requests = IntCounterVec::new(
        Opts::new("piab_http_requests_total", "REST API requests handled"),
        &["resource", "operation", "status"],
    )?;
    registry.register(Box::new(http_requests.clone()))?;

    let generate_duration = HistogramVec::new(
        HistogramOpts::new(
            "piab_generate_duration_seconds",
            "Time spent rendering configuration and triggering reload",
        )
        .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        &["resource"],
    )?;
    registry.register(Box::new(generate_duration.clone()))?;

    let reloads = IntCounterVec::new(
        Opts::new("piab_reloads_total", "Downstream reload calls by outcome"),
        &["resource", "outcome"],
    )?;
    registry.register(Box::new(reloads.clone()))?;

    Ok(Arc::new(ServiceMetrics {
        registry,
        http_requests,
        generate_duration,
        reloads,
    }))
}

impl ServiceMetrics {
    pub fn record_request(&self, resource: &str, operation: &str, status: StatusCode) {
        self.http_requests
            .with_label_values(&[resource, operation, status.as_str()])
            .inc();
    }

    pub fn observe_generate(&self, resource: &str, seconds: f64) {
        self.generate_duration
            .with_label_values(&[resource])
            .observe(seconds);
    }

    pub fn record_reload(&self, resource: &str, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.reloads.with_label_values(&[resource, outcome]).inc();
    }

    /// Text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
