//! FileService — the file lifecycle orchestration.
//!
//! Coordinates one object-store call and one database call per operation,
//! with validation up front and a deliberate failure-isolation policy:
//! a failed store write aborts before the database is touched (no orphan
//! metadata), while a failed store delete is logged and ignored (the
//! database row is authoritative).

use crate::models::file_metadata::{FileMetadata, NewFileMetadata, parse_file_id};
use crate::storage::object_store::{ObjectStore, StoreError};
use crate::storage::repository::MetadataRepo;
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Upload size ceiling, in bytes.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("invalid upload: {0}")]
    InvalidUpload(&'static str),
    #[error("no such file")]
    NotFound,
    #[error("object store write failed")]
    StoreWrite(#[source] StoreError),
    #[error("metadata persistence failed")]
    Persistence(#[from] sqlx::Error),
}

pub type FileResult<T> = Result<T, FileError>;

/// Orchestrates the object store gateway and the metadata repository.
///
/// Holds no state of its own beyond the shared collaborators, so
/// concurrent operations against different identifiers are independent.
#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn ObjectStore>,
    repo: Arc<dyn MetadataRepo>,
}

impl FileService {
    pub fn new(store: Arc<dyn ObjectStore>, repo: Arc<dyn MetadataRepo>) -> Self {
        Self { store, repo }
    }

    /// Store an uploaded payload and persist its metadata row.
    ///
    /// Validation happens before any external call. The object key is
    /// derived as `<millis>-<original_name>` so repeated uploads of the
    /// same filename do not collide.
    pub async fn upload(&self, bytes: Bytes, original_name: &str) -> FileResult<FileMetadata> {
        if original_name.is_empty() {
            return Err(FileError::InvalidUpload("missing filename"));
        }
        if bytes.is_empty() {
            return Err(FileError::InvalidUpload("empty payload"));
        }
        if bytes.len() > MAX_FILE_BYTES {
            return Err(FileError::InvalidUpload("payload exceeds size limit"));
        }

        let object_key = format!("{}-{}", Utc::now().timestamp_millis(), original_name);
        info!(filename = %original_name, key = %object_key, "uploading file to object store");
        let object_url = self
            .store
            .put(&object_key, bytes)
            .await
            .map_err(FileError::StoreWrite)?;

        // A database failure past this point leaves an orphaned object in
        // the store; accepted tradeoff, not remediated.
        let record = self
            .repo
            .create(NewFileMetadata {
                id: Uuid::new_v4(),
                filename: original_name.to_string(),
                object_key,
                object_url,
                upload_date: Utc::now().date_naive(),
            })
            .await?;
        info!(file_id = %record.id, "file metadata persisted");
        Ok(record)
    }

    /// Look up a metadata row by its textual identifier.
    ///
    /// A malformed identifier is reported as `NotFound`, the same as a
    /// missing row.
    pub async fn fetch(&self, raw_id: &str) -> FileResult<FileMetadata> {
        let id = parse_file_id(raw_id).ok_or(FileError::NotFound)?;
        self.repo.find_by_id(id).await?.ok_or(FileError::NotFound)
    }

    /// Remove a file: best-effort store delete, authoritative row delete.
    pub async fn remove(&self, raw_id: &str) -> FileResult<()> {
        let id = parse_file_id(raw_id).ok_or(FileError::NotFound)?;
        let record = self.repo.find_by_id(id).await?.ok_or(FileError::NotFound)?;

        // The store delete is advisory: log the outcome either way and
        // carry on to the row delete.
        match self.store.delete(&record.object_key).await {
            Ok(()) => info!(key = %record.object_key, "object store delete completed"),
            Err(err) => warn!(
                key = %record.object_key,
                error = %err,
                "object store delete failed; removing metadata anyway"
            ),
        }

        if !self.repo.delete(id).await? {
            // Lost a race with a concurrent delete.
            return Err(FileError::NotFound);
        }
        info!(file_id = %id, "file metadata deleted");
        Ok(())
    }
}
