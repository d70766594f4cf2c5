//! Data models for the file lifecycle service.
//!
//! The metadata row maps to its table via `sqlx::FromRow` and serializes
//! as JSON via `serde`. The liveness table is insert-only and never read
//! back, so it has no struct here; only the repository touches it.

pub mod file_metadata;
