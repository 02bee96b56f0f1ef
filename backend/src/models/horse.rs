//! Horse records, write candidates and pedigree projections.
//!
//! [`Horse`] is the persisted shape. [`HorseCreate`] and [`HorseUpdate`] are
//! the unvalidated candidates submitted by callers; every field is optional so
//! the validator can report missing values instead of failing deserialization.
//! [`NewHorse`] is what the store receives once a candidate has passed
//! validation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::owner::{Owner, OwnerId, OwnerSummary};

crate::define_id_type!(
    /// Store-assigned horse identifier.
    i64,
    HorseId
);

/// Biological sex of a horse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted horse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<HorseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<HorseId>,
}

/// Validated field set handed to the store on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHorse {
    pub name: String,
    pub description: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub owner_id: Option<OwnerId>,
    pub mother_id: Option<HorseId>,
    pub father_id: Option<HorseId>,
}

impl NewHorse {
    pub fn into_horse(self, id: HorseId) -> Horse {
        Horse {
            id,
            name: self.name,
            description: self.description,
            date_of_birth: self.date_of_birth,
            sex: self.sex,
            owner_id: self.owner_id,
            mother_id: self.mother_id,
            father_id: self.father_id,
        }
    }
}

/// Candidate for creating a horse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseCreate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    #[serde(default)]
    pub mother_id: Option<HorseId>,
    #[serde(default)]
    pub father_id: Option<HorseId>,
}

/// Candidate for replacing a stored horse wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseUpdate {
    pub id: HorseId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    #[serde(default)]
    pub mother_id: Option<HorseId>,
    #[serde(default)]
    pub father_id: Option<HorseId>,
    /// Whether the client asked for the stored image to be dropped.
    #[serde(default)]
    pub delete_image: Option<bool>,
}

impl HorseUpdate {
    /// Build an update candidate from a create-shaped body and a path id.
    pub fn from_create(id: HorseId, body: HorseCreate, delete_image: Option<bool>) -> Self {
        Self {
            id,
            name: body.name,
            description: body.description,
            date_of_birth: body.date_of_birth,
            sex: body.sex,
            owner_id: body.owner_id,
            mother_id: body.mother_id,
            father_id: body.father_id,
            delete_image,
        }
    }

    /// Field view shared with the create path.
    pub fn as_create(&self) -> HorseCreate {
        HorseCreate {
            name: self.name.clone(),
            description: self.description.clone(),
            date_of_birth: self.date_of_birth,
            sex: self.sex,
            owner_id: self.owner_id,
            mother_id: self.mother_id,
            father_id: self.father_id,
        }
    }
}

/// Error returned when converting a candidate that is missing a required field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("candidate is missing required field '{0}'")]
pub struct MissingField(pub &'static str);

impl TryFrom<HorseCreate> for NewHorse {
    type Error = MissingField;

    fn try_from(candidate: HorseCreate) -> Result<Self, Self::Error> {
        Ok(NewHorse {
            name: candidate.name.ok_or(MissingField("name"))?,
            description: candidate.description,
            date_of_birth: candidate.date_of_birth.ok_or(MissingField("dateOfBirth"))?,
            sex: candidate.sex.ok_or(MissingField("sex"))?,
            owner_id: candidate.owner_id,
            mother_id: candidate.mother_id,
            father_id: candidate.father_id,
        })
    }
}

/// Lightweight `{id, name}` projection of a parent horse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseParent {
    pub id: HorseId,
    pub name: String,
}

impl From<&Horse> for HorseParent {
    fn from(horse: &Horse) -> Self {
        Self {
            id: horse.id,
            name: horse.name.clone(),
        }
    }
}

/// One node of a pedigree.
///
/// A strict binary tree: the same ancestor reached through both lines appears
/// twice. Subtrees are absent when the parent is unknown or the generation
/// budget ran out before reaching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTreeNode {
    pub id: HorseId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<FamilyTreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<FamilyTreeNode>>,
}

impl FamilyTreeNode {
    pub fn leaf(horse: &Horse) -> Self {
        Self {
            id: horse.id,
            name: horse.name.clone(),
            date_of_birth: horse.date_of_birth,
            mother: None,
            father: None,
        }
    }

    /// Number of generations in this tree, counting the node itself.
    pub fn generations(&self) -> usize {
        let mother = self.mother.as_ref().map_or(0, |m| m.generations());
        let father = self.father.as_ref().map_or(0, |f| f.generations());
        1 + mother.max(father)
    }

    /// Total number of nodes, duplicates included.
    pub fn node_count(&self) -> usize {
        1 + self.mother.as_ref().map_or(0, |m| m.node_count())
            + self.father.as_ref().map_or(0, |f| f.node_count())
    }
}

/// Horse with its owner and immediate parents resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseDetail {
    pub id: HorseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<HorseParent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<HorseParent>,
}

/// Filter for horse searches.
///
/// Unset fields do not filter. Text filters match case-insensitive
/// substrings; `date_of_birth` keeps horses born strictly before it;
/// `owner_name` is matched against the owner's `"first last"` name, so horses
/// without an owner never match it. `limit` caps the number of results,
/// ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseSearch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub exclude_id: Option<HorseId>,
    #[serde(default)]
    pub limit: Option<i64>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl HorseSearch {
    /// True when no parameter is set at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `horse`, owned by `owner`, passes every set filter.
    pub fn matches(&self, horse: &Horse, owner: Option<&Owner>) -> bool {
        if let Some(name) = &self.name {
            if !contains_ignore_case(&horse.name, name) {
                return false;
            }
        }
        if let Some(description) = &self.description {
            match &horse.description {
                Some(text) if contains_ignore_case(text, description) => {}
                _ => return false,
            }
        }
        if self.date_of_birth.is_some_and(|before| horse.date_of_birth >= before) {
            return false;
        }
        if self.sex.is_some_and(|sex| horse.sex != sex) {
            return false;
        }
        if self.exclude_id == Some(horse.id) {
            return false;
        }
        if let Some(owner_name) = &self.owner_name {
            match owner {
                Some(owner) if contains_ignore_case(&owner.full_name(), owner_name) => {}
                _ => return false,
            }
        }
        true
    }
}
