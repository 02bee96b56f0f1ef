//! Repository factory for dependency injection.
//!
//! This module creates repository instances from runtime configuration.

use std::sync::Arc;

use log::info;

use super::repositories::LocalRepository;
use super::repository::FullRepository;
use super::seed;
use crate::config::RegistryConfig;
use crate::services::ServiceResult;

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use horse_registry::db::RepositoryFactory;
///
/// let repo = RepositoryFactory::create_local();
/// # let _ = repo;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a local repository and load `repository.seed_file` into it, if set.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn FullRepository>)` - Repository instance
    /// * `Err(ServiceError)` - If the seed file cannot be read or one of its horses is rejected
    pub async fn from_config(config: &RegistryConfig) -> ServiceResult<Arc<dyn FullRepository>> {
        let repo = LocalRepository::new();

        if let Some(path) = &config.repository.seed_file {
            info!("Loading seed data from {}", path.display());
            seed::load_seed_file(&repo, path).await?;
        }

        Ok(Arc::new(repo))
    }
}
