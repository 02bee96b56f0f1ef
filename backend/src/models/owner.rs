//! Owner records as seen by the horse registry.

use serde::{Deserialize, Serialize};

crate::define_id_type!(
    /// Store-assigned owner identifier.
    i64,
    OwnerId
);

/// A persisted owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Owner {
    /// `"first last"`, the form owner-name searches match against.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Owner name as embedded in horse details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub first_name: String,
    pub last_name: String,
}

impl From<&Owner> for OwnerSummary {
    fn from(owner: &Owner) -> Self {
        Self {
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
        }
    }
}
