//! Repository trait definitions for store operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`horse`]: Horse lookups, child lookups and writes
//! - [`owner`]: Owner existence and name lookups
//!
//! # Convenience Trait Bound
//!
//! For functions that need both capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let horse = repo.get_horse(HorseId(1)).await?;
//!     if let Some(owner_id) = horse.owner_id {
//!         repo.get_owner(owner_id).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod horse;
pub mod owner;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use horse::HorseRepository;
pub use owner::OwnerRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits.
pub trait FullRepository: HorseRepository + OwnerRepository {}

impl<T> FullRepository for T where T: HorseRepository + OwnerRepository {}
