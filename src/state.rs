//! Shared application state.

use crate::services::file_service::FileService;
use crate::storage::repository::MetadataRepo;
use std::sync::Arc;

/// Collaborators constructed once at startup and injected into every
/// handler via the router state.
#[derive(Clone)]
pub struct AppState {
    pub files: FileService,
    pub repo: Arc<dyn MetadataRepo>,
}

impl AppState {
    pub fn new(files: FileService, repo: Arc<dyn MetadataRepo>) -> Self {
        Self { files, repo }
    }
}
