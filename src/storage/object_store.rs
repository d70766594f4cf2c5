//! Thin gateway over the remote object store.
//!
//! Each operation is a single S3 call with no retry or backoff; failures
//! are surfaced verbatim for the service layer to interpret.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object store bucket is not configured")]
    Misconfigured,
    #[error("object store request failed: {0}")]
    Remote(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Put/get/delete against a remote byte-blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public location.
    async fn put(&self, key: &str, bytes: Bytes) -> StoreResult<String>;

    /// Fetch the payload stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Bytes>;

    /// Remove the payload stored under `key`.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// `ObjectStore` backed by an S3 bucket.
#[derive(Clone)]
pub struct S3Gateway {
    client: S3Client,
    bucket: String,
}

impl S3Gateway {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// The bucket name comes from the environment and may be absent; that
    /// is only discovered when an operation is attempted.
    fn bucket(&self) -> StoreResult<&str> {
        if self.bucket.is_empty() {
            return Err(StoreError::Misconfigured);
        }
        Ok(&self.bucket)
    }

    fn location(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3Gateway {
    async fn put(&self, key: &str, bytes: Bytes) -> StoreResult<String> {
        let bucket = self.bucket()?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(remote)?;
        Ok(self.location(key))
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let bucket = self.bucket()?;
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(remote)?;
        let data = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::Remote(err.to_string()))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let bucket = self.bucket()?;
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(remote)?;
        Ok(())
    }
}

/// Flatten an SDK error chain into a loggable message.
fn remote<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Remote(DisplayErrorContext(err).to_string())
}
