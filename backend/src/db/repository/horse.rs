//! Horse repository trait.
//!
//! This trait is the single store boundary used by both the integrity
//! validator and the pedigree builder.
//!
//! # Atomicity
//!
//! Implementations make each call atomic on its own, but nothing here spans
//! calls. The service layer reads parents and children, decides, and then
//! writes; whoever owns the transaction boundary must run that sequence as one
//! unit of work, otherwise a concurrent write can invalidate a decision that
//! was already taken.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Horse, HorseId, HorseParent, HorseSearch, NewHorse};

/// Repository trait for horse records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait HorseRepository: Send + Sync {
    /// Check if the store is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if the store is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Retrieve a horse by ID.
    ///
    /// # Returns
    /// * `Ok(Horse)` - The stored horse
    /// * `Err(RepositoryError::NotFound)` - If no horse has this ID
    async fn get_horse(&self, id: HorseId) -> RepositoryResult<Horse>;

    /// Retrieve the `{id, name}` summary of a horse.
    ///
    /// # Returns
    /// * `Ok(HorseParent)` - The summary
    /// * `Err(RepositoryError::NotFound)` - If no horse has this ID
    async fn get_parent_summary(&self, id: HorseId) -> RepositoryResult<HorseParent>;

    /// All horses that reference `parent_id` as mother or father.
    ///
    /// Returns an empty list when there are none, including when `parent_id`
    /// itself does not exist.
    async fn get_children(&self, parent_id: HorseId) -> RepositoryResult<Vec<Horse>>;

    /// All stored horses ordered by ID.
    async fn list_horses(&self) -> RepositoryResult<Vec<Horse>>;

    /// Horses passing every set filter of `search`, ordered by ID.
    ///
    /// At most `search.limit` horses are returned when a limit is set; the
    /// limit applies after all filters, including the owner name.
    async fn search_horses(&self, search: &HorseSearch) -> RepositoryResult<Vec<Horse>>;

    /// Store a new horse and return it with its assigned ID.
    async fn create_horse(&self, horse: NewHorse) -> RepositoryResult<Horse>;

    /// Replace every field of an existing horse.
    ///
    /// # Returns
    /// * `Ok(Horse)` - The horse as stored after the update
    /// * `Err(RepositoryError::NotFound)` - If no horse has this ID
    async fn update_horse(&self, id: HorseId, horse: NewHorse) -> RepositoryResult<Horse>;

    /// Delete a horse.
    ///
    /// Children that referenced the deleted horse lose that reference.
    ///
    /// # Returns
    /// * `Ok(())` - The horse was removed
    /// * `Err(RepositoryError::NotFound)` - If no horse has this ID
    async fn delete_horse(&self, id: HorseId) -> RepositoryResult<()>;
}
