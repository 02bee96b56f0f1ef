//! Owner lookups needed by the horse registry.
//!
//! Owners are managed elsewhere; the registry only checks that a referenced
//! owner exists and resolves owner names for horse details.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Owner, OwnerId};

#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Check whether an owner with this ID exists.
    async fn owner_exists(&self, id: OwnerId) -> RepositoryResult<bool>;

    /// Retrieve an owner by ID.
    ///
    /// # Returns
    /// * `Ok(Owner)` - The stored owner
    /// * `Err(RepositoryError::NotFound)` - If no owner has this ID
    async fn get_owner(&self, id: OwnerId) -> RepositoryResult<Owner>;
}
