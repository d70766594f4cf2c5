//! Liveness handler.
//!
//! `GET /healthz` proves write-path health by inserting one liveness row.
//! Every response, including rejections, carries cache-disabling headers
//! and an explicit zero content length.

use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::Response,
};
use bytes::Bytes;
use tracing::{info, warn};

/// `GET /healthz`
///
/// Rejects any request carrying a query string or a body, so the probe
/// cannot be misused as a query or command endpoint. Otherwise inserts a
/// liveness row: 200 on success, 503 on a database failure.
pub async fn healthz(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    if uri.query().is_some_and(|q| !q.is_empty()) || !body.is_empty() {
        warn!("healthz request carried a query string or body");
        return probe_response(StatusCode::BAD_REQUEST);
    }

    match state.repo.record_liveness().await {
        Ok(()) => {
            info!("health check succeeded");
            probe_response(StatusCode::OK)
        }
        Err(err) => {
            warn!(error = %err, "health check write failed");
            probe_response(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Unsupported methods on `/healthz` — 405 with the same probe headers.
pub async fn healthz_disallowed(method: Method) -> Response {
    warn!(%method, "method not allowed on /healthz");
    probe_response(StatusCode::METHOD_NOT_ALLOWED)
}

/// Empty-body response with the probe's mandatory headers.
fn probe_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
    response
}
