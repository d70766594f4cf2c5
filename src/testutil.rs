//! In-memory collaborators for tests.
//!
//! Both fakes support failure injection and count the calls they receive,
//! so tests can assert not just outcomes but also that validation rejects
//! input before any store or database call is attempted.

use crate::models::file_metadata::{FileMetadata, NewFileMetadata};
use crate::storage::object_store::{ObjectStore, StoreError, StoreResult};
use crate::storage::repository::MetadataRepo;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

/// `ObjectStore` fake keyed in a hash map.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
    put_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Bytes) -> StoreResult<String> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Remote("injected put failure".into()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(format!("https://test-bucket.s3.amazonaws.com/{key}"))
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::Remote(format!("no such object: {key}")))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Remote("injected delete failure".into()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// `MetadataRepo` fake over a hash map of rows.
#[derive(Default)]
pub struct MemoryRepo {
    rows: Mutex<HashMap<Uuid, FileMetadata>>,
    liveness_rows: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    find_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl MemoryRepo {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Seed a row directly, bypassing `create`. Lets tests build legacy
    /// rows with unset columns.
    pub fn insert_row(&self, record: FileMetadata) {
        self.rows.lock().unwrap().insert(record.id, record);
    }

    pub fn row(&self, id: Uuid) -> Option<FileMetadata> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn liveness_rows(&self) -> usize {
        self.liveness_rows.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataRepo for MemoryRepo {
    async fn create(&self, fields: NewFileMetadata) -> Result<FileMetadata, sqlx::Error> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let now = Utc::now();
        let record = FileMetadata {
            id: fields.id,
            filename: fields.filename,
            object_key: fields.object_key,
            object_url: fields.object_url,
            upload_date: Some(fields.upload_date),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.rows.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileMetadata>, sqlx::Error> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn record_liveness(&self) -> Result<(), sqlx::Error> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.liveness_rows.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
