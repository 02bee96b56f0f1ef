//! Storage module for horse and owner records.
//!
//! This module provides abstractions for store operations via the Repository
//! pattern, so the service layer never depends on a concrete backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - Business Logic             │
//! │  - Integrity validation                                 │
//! │  - Pedigree construction                                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation
//! - `factory`: creates repository instances from configuration
//! - `seed`: startup data loading

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod seed;

pub use factory::RepositoryFactory;
pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, HorseRepository, OwnerRepository, RepositoryError,
    RepositoryResult,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

use crate::config::RegistryConfig;

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton from configuration.
///
/// Calling this again after a successful initialization is a no-op.
pub async fn init_repository(config: &RegistryConfig) -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = RepositoryFactory::from_config(config)
        .await
        .context("Failed to initialize repository")?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
///
/// Falls back to an empty local repository when [`init_repository`] was never
/// called.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = REPOSITORY.set(RepositoryFactory::create_local());
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
