//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::PedigreeSettings;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Bounds applied to family tree requests
    pub pedigree: PedigreeSettings,
}

impl AppState {
    /// Create a new application state with the given repository and pedigree settings.
    pub fn new(repository: Arc<dyn FullRepository>, pedigree: PedigreeSettings) -> Self {
        Self { repository, pedigree }
    }
}
