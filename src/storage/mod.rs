//! External collaborators: the object store and the metadata table.
//!
//! Both are exposed as traits so the service layer can be exercised
//! against in-memory implementations in tests.

pub mod object_store;
pub mod repository;
