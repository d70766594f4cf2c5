//! HTTP handlers for the file lifecycle endpoints.
//!
//! Handlers translate multipart/path input into service calls and map the
//! service's error taxonomy onto the status-code contract. Read and delete
//! failures of any kind collapse to 404 here so callers cannot distinguish
//! "does not exist" from "lookup failed".

use crate::{
    errors::ApiError,
    models::file_metadata::FileResponse,
    services::file_service::FileError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use tracing::{info, warn};

/// `POST /v1/file` — upload a file.
///
/// Expects a single multipart field named `file`. Any other field name,
/// a malformed multipart body, or a failed body read is a 400.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    info!("file upload request received");

    let mut file: Option<(String, Bytes)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    return Err(ApiError::invalid_request(format!(
                        "unexpected multipart field {:?}",
                        field.name()
                    )));
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    ApiError::invalid_request(format!("failed to read upload body: {err}"))
                })?;
                file = Some((filename, bytes));
            }
            Ok(None) => break,
            Err(err) => {
                return Err(ApiError::invalid_request(format!(
                    "malformed multipart body: {err}"
                )));
            }
        }
    }

    let Some((filename, bytes)) = file else {
        return Err(ApiError::invalid_request("no file field in upload request"));
    };

    let record = state.files.upload(bytes, &filename).await.map_err(|err| match err {
        FileError::InvalidUpload(reason) => ApiError::invalid_request(reason),
        other => ApiError::internal(format!("file upload failed: {other:?}")),
    })?;

    Ok((StatusCode::CREATED, Json(FileResponse::from(record))))
}

/// `GET /v1/file/{id}` — fetch file metadata.
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!(file_id = %id, "file metadata request received");

    let record = state
        .files
        .fetch(&id)
        .await
        .map_err(|err| ApiError::not_found(format!("file lookup failed: {err:?}")))?;

    Ok((StatusCode::OK, Json(FileResponse::from(record))))
}

/// `DELETE /v1/file/{id}` — delete a file.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!(file_id = %id, "file deletion request received");

    state
        .files
        .remove(&id)
        .await
        .map_err(|err| ApiError::not_found(format!("file deletion failed: {err:?}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Unsupported methods on `/v1/file`: GET and DELETE are rejected as bad
/// requests (the collection has no read or delete semantics), everything
/// else as method-not-allowed.
pub async fn file_collection_disallowed(method: Method) -> ApiError {
    warn!(%method, "method not allowed on /v1/file");
    if method == Method::GET || method == Method::DELETE {
        ApiError::invalid_request(format!("{method} not supported on /v1/file"))
    } else {
        ApiError::method_not_allowed(format!("{method} not supported on /v1/file"))
    }
}

/// Unsupported methods on `/v1/file/{id}`.
pub async fn file_item_disallowed(method: Method) -> ApiError {
    warn!(%method, "method not allowed on /v1/file/{{id}}");
    ApiError::method_not_allowed(format!("{method} not supported on /v1/file/{{id}}"))
}
