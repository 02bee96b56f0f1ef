//! Data Transfer Objects for the HTTP API.
//!
//! Horse records and projections already derive Serialize/Deserialize and are
//! re-exported from the models module; this module only adds request and
//! envelope types specific to the REST surface.

use serde::{Deserialize, Serialize};

pub use crate::models::{
    FamilyTreeNode, Horse, HorseCreate, HorseDetail, HorseId, HorseSearch, HorseUpdate,
};

/// Query parameters for the family tree endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyTreeQuery {
    /// Number of generations to include, root counted
    #[serde(default = "default_generations")]
    pub generations: i64,
}

fn default_generations() -> i64 {
    1
}

impl Default for FamilyTreeQuery {
    fn default() -> Self {
        Self {
            generations: default_generations(),
        }
    }
}

/// Request body for replacing a horse.
///
/// The horse id comes from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseUpdateRequest {
    #[serde(flatten)]
    pub horse: HorseCreate,
    #[serde(default)]
    pub delete_image: Option<bool>,
}

impl HorseUpdateRequest {
    pub fn into_update(self, id: HorseId) -> HorseUpdate {
        HorseUpdate::from_create(id, self.horse, self.delete_image)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub database: String,
}

/// Horse list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorseListResponse {
    /// Matching horses ordered by id
    pub horses: Vec<Horse>,
    /// Number of horses returned
    pub total: usize,
}
