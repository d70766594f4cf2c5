//! Route table for the file lifecycle API.
//!
//! ## Structure
//! - `POST   /v1/file`       — upload a file (multipart field `file`)
//! - `GET    /v1/file/{id}`  — fetch file metadata
//! - `DELETE /v1/file/{id}`  — delete a file
//! - `GET    /healthz`       — liveness probe (database write)
//!
//! Method handling is part of the contract: GET/DELETE on the collection
//! path are 400, any other unsupported method is 405, and unmatched paths
//! are 404 — always with empty bodies.

use crate::{
    handlers::{
        file_handlers::{
            delete_file, file_collection_disallowed, file_item_disallowed, get_file, upload_file,
        },
        health_handlers::{healthz, healthz_disallowed},
    },
    services::file_service::MAX_FILE_BYTES,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    routing::{MethodFilter, on, post},
};
use tracing::warn;

/// Slack above the file size ceiling for multipart framing, so an
/// over-limit file is still read and rejected with 400 rather than cut
/// off mid-body.
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_BYTES + 1024 * 1024;

/// Build the router. Shared state (`AppState`) is carried to all handlers.
pub fn routes() -> Router<AppState> {
    // `on(MethodFilter::GET, ..)` rather than `get(..)`: the latter would
    // also answer HEAD, which the contract requires to be a 405.
    Router::new()
        .route(
            "/healthz",
            on(MethodFilter::GET, healthz).fallback(healthz_disallowed),
        )
        .route(
            "/v1/file",
            post(upload_file).fallback(file_collection_disallowed),
        )
        .route(
            "/v1/file/{id}",
            on(MethodFilter::GET, get_file)
                .on(MethodFilter::DELETE, delete_file)
                .fallback(file_item_disallowed),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Unmatched paths — 404, empty body.
async fn not_found(method: Method, uri: Uri) -> StatusCode {
    warn!(%method, %uri, "no route matched");
    StatusCode::NOT_FOUND
}
