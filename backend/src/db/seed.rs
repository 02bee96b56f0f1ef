//! Startup seed data for the in-memory store.
//!
//! Seed files are JSON documents:
//!
//! ```json
//! {
//!   "owners": [{ "firstName": "Ada", "lastName": "Lovelace" }],
//!   "horses": [
//!     { "name": "Wendy", "dateOfBirth": "2010-03-14", "sex": "FEMALE", "ownerId": 1 },
//!     { "name": "Hugo", "dateOfBirth": "2016-07-01", "sex": "MALE", "motherId": 1 }
//!   ]
//! }
//! ```
//!
//! Owners are inserted directly. Horses go through the regular create path in
//! file order, so a seed file cannot introduce data that violates the integrity
//! rules. In an empty store ids are assigned sequentially from 1, which lets
//! later entries reference earlier ones by position.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::repositories::LocalRepository;
use super::repository::{ErrorContext, RepositoryError};
use crate::models::HorseCreate;
use crate::services::{self, ServiceResult};

/// Owner entry of a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedOwner {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parsed seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub owners: Vec<SeedOwner>,
    #[serde(default)]
    pub horses: Vec<HorseCreate>,
}

/// Counts of what a seed run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub owners: usize,
    pub horses: usize,
}

impl SeedData {
    pub fn from_json_str(content: &str) -> Result<Self, RepositoryError> {
        serde_json::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse seed data: {}", e))
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read seed file: {}", e),
                ErrorContext::new("load_seed").with_details(path.display().to_string()),
            )
        })?;
        Self::from_json_str(&content)
    }
}

/// Insert seed owners and horses into `repo`.
///
/// Stops at the first horse that fails validation; earlier entries stay
/// stored.
pub async fn apply_seed(repo: &LocalRepository, seed: SeedData) -> ServiceResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for owner in seed.owners {
        let stored = repo.store_owner_impl(&owner.first_name, &owner.last_name, owner.description.as_deref());
        debug!("Seeded owner {} ({} {})", stored.id, stored.first_name, stored.last_name);
        summary.owners += 1;
    }

    for horse in seed.horses {
        services::create_horse(repo, horse).await?;
        summary.horses += 1;
    }

    info!(
        "Seeded {} owner(s) and {} horse(s)",
        summary.owners, summary.horses
    );
    Ok(summary)
}

/// Read a seed file and apply it to `repo`.
pub async fn load_seed_file<P: AsRef<Path>>(repo: &LocalRepository, path: P) -> ServiceResult<SeedSummary> {
    let seed = SeedData::from_file(path)?;
    apply_seed(repo, seed).await
}
