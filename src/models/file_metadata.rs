//! Represents the metadata row tracked for one uploaded file.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::{Uuid, Variant};

/// Metadata for a single uploaded file.
///
/// The byte payload itself lives in the object store under `object_key`;
/// this row only tracks where it went and when. Rows are immutable after
/// creation apart from the bookkeeping timestamps.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct FileMetadata {
    /// Primary key, generated as a random v4 UUID at upload time.
    pub id: Uuid,

    /// Original filename as provided by the uploader.
    pub filename: String,

    /// Key the payload was stored under (`<millis>-<filename>`).
    pub object_key: String,

    /// Public URL built from the bucket and the object key.
    pub object_url: String,

    /// Calendar date (UTC) of the upload. Nullable to tolerate legacy rows
    /// created before the column existed.
    pub upload_date: Option<NaiveDate>,

    /// Maintained by the persistence layer.
    pub created_at: Option<DateTime<Utc>>,

    /// Maintained by the persistence layer.
    pub updated_at: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Upload date to report to callers.
    ///
    /// Falls back to the row's creation date, then to today, for rows that
    /// predate the `upload_date` column. The fallback is never written back.
    pub fn resolved_upload_date(&self) -> NaiveDate {
        self.upload_date
            .or_else(|| self.created_at.map(|t| t.date_naive()))
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Field set for inserting a new metadata row.
#[derive(Clone, Debug)]
pub struct NewFileMetadata {
    pub id: Uuid,
    pub filename: String,
    pub object_key: String,
    pub object_url: String,
    pub upload_date: NaiveDate,
}

/// JSON body returned by the upload and read endpoints.
#[derive(Serialize, Deserialize, Debug)]
pub struct FileResponse {
    pub file_name: String,
    pub id: Uuid,
    pub url: String,
    pub upload_date: NaiveDate,
}

impl From<FileMetadata> for FileResponse {
    fn from(record: FileMetadata) -> Self {
        let upload_date = record.resolved_upload_date();
        Self {
            file_name: record.filename,
            id: record.id,
            url: record.object_url,
            upload_date,
        }
    }
}

/// Parse a path parameter as a canonical hyphenated v4 UUID.
///
/// Accepts only the 36-character hyphenated form, case-insensitive, with
/// the v4 version nibble and RFC 4122 variant bits. Anything else is
/// treated as "no such record" by callers rather than as a distinct
/// validation failure, so the schema is not leaked.
pub fn parse_file_id(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    let id = Uuid::try_parse(raw).ok()?;
    (id.get_version_num() == 4 && id.get_variant() == Variant::RFC4122).then_some(id)
}
