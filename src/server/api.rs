//! REST handlers for one resource collection
//!
//! ## Endpoints (`{resource}` is `alerts` or `receivers`)
//! - GET    /v1/{resource}           - List all records
//! - POST   /v1/{resource}           - Create a record
//! - GET    /v1/{resource}/{id}      - Fetch one record
//! - PUT    /v1/{resource}/{id}      - Replace one record
//! - DELETE /v1/{resource}/{id}      - Delete one record
//! - POST   /v1/{resource}/generate  - Render the config file and reload
//!
//! Unknown and malformed identifiers both answer 404 with an empty body.

use crate::controller::{ControllerError, ResourceController};
use crate::model::Resource;
use crate::server::metrics::SharedMetrics;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

/// Per-resource handler state
pub struct ApiState<R: Resource> {
    controller: Arc<ResourceController<R>>,
    metrics: SharedMetrics,
}

impl<R: Resource> Clone for ApiState<R> {
    fn clone(&self) -> Self {
        ApiState {
            controller: self.controller.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<R: Resource> ApiState<R> {
    /// Count the request and hand the response back
    fn finish(&self, operation: &str, response: Response) -> Response {
        self.metrics
            .record_request(R::COLLECTION, operation, response.status());
        response
    }
}

/// Decode a request body into a record
///
/// An empty body or a JSON `null` decodes to the default record; malformed
/// JSON is an error.
pub fn decode_body<R: Resource>(body: &[u8]) -> Result<R, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(R::default());
    }
    match serde_json::from_slice::<serde_json::Value>(body)? {
        serde_json::Value::Null => Ok(R::default()),
        value => serde_json::from_value(value),
    }
}

/// 200 with a pretty-printed JSON body
fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn error_response<R: Resource>(operation: &str, error: ControllerError) -> Response {
    match error {
        ControllerError::NotFound => StatusCode::NOT_FOUND.into_response(),
        ControllerError::Reload(e) => {
            error!(resource = R::COLLECTION, operation, error = %e, "Reload failed");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
        other => {
            error!(resource = R::COLLECTION, operation, error = %other, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}

fn bad_request<R: Resource>(operation: &str, error: serde_json::Error) -> Response {
    warn!(resource = R::COLLECTION, operation, error = %error, "Rejected malformed JSON body");
    (
        StatusCode::BAD_REQUEST,
        format!("Invalid JSON body: {}", error),
    )
        .into_response()
}

async fn list<R: Resource>(State(state): State<ApiState<R>>) -> Response {
    let response = match state.controller.list().await {
        Ok(records) => json_response(&records),
        Err(e) => error_response::<R>("list", e),
    };
    state.finish("list", response)
}

async fn get_one<R: Resource>(
    State(state): State<ApiState<R>>,
    Path(id): Path<String>,
) -> Response {
    let response = match state.controller.get(&id).await {
        Ok(record) => json_response(&record),
        Err(e) => error_response::<R>("get", e),
    };
    state.finish("get", response)
}

async fn create<R: Resource>(State(state): State<ApiState<R>>, body: Bytes) -> Response {
    let response = match decode_body::<R>(&body) {
        Ok(record) => match state.controller.create(record).await {
            Ok(created) => json_response(&created),
            Err(e) => error_response::<R>("create", e),
        },
        Err(e) => bad_request::<R>("create", e),
    };
    state.finish("create", response)
}

async fn update<R: Resource>(
    State(state): State<ApiState<R>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let response = match decode_body::<R>(&body) {
        Ok(record) => match state.controller.update(&id, record).await {
            Ok(_) => StatusCode::OK.into_response(),
            Err(e) => error_response::<R>("update", e),
        },
        Err(e) => bad_request::<R>("update", e),
    };
    state.finish("update", response)
}

async fn delete<R: Resource>(
    State(state): State<ApiState<R>>,
    Path(id): Path<String>,
) -> Response {
    let response = match state.controller.delete(&id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response::<R>("delete", e),
    };
    state.finish("delete", response)
}

async fn generate<R: Resource>(State(state): State<ApiState<R>>) -> Response {
    let started = Instant::now();
    let result = state.controller.generate().await;
    state
        .metrics
        .observe_generate(R::COLLECTION, started.elapsed().as_secs_f64());

    let response = match result {
        Ok(()) => {
            state.metrics.record_reload(R::COLLECTION, true);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            if matches!(e, ControllerError::Reload(_)) {
                state.metrics.record_reload(R::COLLECTION, false);
            }
            error_response::<R>("generate", e)
        }
    };
    state.finish("generate", response)
}

/// Other methods on the generate path behave like an unknown identifier
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Routes for one resource under `/v1/{R::COLLECTION}`
pub fn resource_router<R: Resource>(
    controller: Arc<ResourceController<R>>,
    metrics: SharedMetrics,
) -> Router {
    let base = format!("/v1/{}", R::COLLECTION);

    Router::new()
        .route(&base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/generate", base),
            post(generate::<R>).fallback(not_found),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
        .with_state(ApiState {
            controller,
            metrics,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "api_test.rs"]
mod tests;
