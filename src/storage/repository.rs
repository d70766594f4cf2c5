//! Thin pass-through over the relational store.
//!
//! No caching, no multi-row transactions, no queries beyond primary-key
//! lookup. Errors are surfaced as `sqlx::Error` for the service layer to
//! classify.

use crate::models::file_metadata::{FileMetadata, NewFileMetadata};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Create/find/delete against the metadata table, plus the liveness write.
#[async_trait]
pub trait MetadataRepo: Send + Sync {
    /// Insert a new metadata row and return it as stored.
    async fn create(&self, fields: NewFileMetadata) -> Result<FileMetadata, sqlx::Error>;

    /// Primary-key lookup.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileMetadata>, sqlx::Error>;

    /// Delete by primary key. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    /// Insert one liveness row to prove the write path works.
    async fn record_liveness(&self) -> Result<(), sqlx::Error>;
}

/// `MetadataRepo` backed by the shared Postgres pool.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataRepo for PgRepository {
    async fn create(&self, fields: NewFileMetadata) -> Result<FileMetadata, sqlx::Error> {
        sqlx::query_as::<_, FileMetadata>(
            "INSERT INTO file_metadata (id, filename, object_key, object_url, upload_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, filename, object_key, object_url, upload_date,
                       created_at, updated_at",
        )
        .bind(fields.id)
        .bind(&fields.filename)
        .bind(&fields.object_key)
        .bind(&fields.object_url)
        .bind(fields.upload_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileMetadata>, sqlx::Error> {
        sqlx::query_as::<_, FileMetadata>(
            "SELECT id, filename, object_key, object_url, upload_date,
                    created_at, updated_at
             FROM file_metadata WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM file_metadata WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_liveness(&self) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO health_checks (datetime) VALUES (now())")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
