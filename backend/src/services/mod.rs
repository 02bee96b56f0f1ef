//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP layer and the repository traits. They
//! enforce the genealogical integrity rules on writes and build the read
//! projections (details and pedigrees).
//!
//! - `validation`: integrity validator for create and update candidates
//! - `pedigree`: depth-bounded ancestry tree builder
//! - `horses`: caller-facing operations combining both with the store

pub mod error;
pub mod horses;
pub mod pedigree;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use horses::{
    create_horse, delete_horse, get_family_tree, get_horse_detail, health_check, list_horses,
    search_horses, update_horse,
};
pub use pedigree::PedigreeBuilder;
pub use validation::{validate_for_search, validate_generations, HorseValidator, ValidationReport};
