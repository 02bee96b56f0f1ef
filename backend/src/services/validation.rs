//! Genealogical integrity validation for horse writes.
//!
//! Every check runs to completion and lands in one of two lists of a
//! [`ValidationReport`]:
//!
//! - **errors**: structural defects (missing or malformed fields, references
//!   to owners or parents that do not exist);
//! - **conflicts**: well-formed data that contradicts stored records (parent
//!   sex or age, a horse named as its own parent, and the cascade rules for
//!   horses that already have children).
//!
//! Structural errors take precedence when the report is turned into a result,
//! but conflicts are always computed so diagnostics are complete.
//!
//! The validator holds no state besides the store handle and the reference
//! date; it only reads.

use chrono::{Local, NaiveDate};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::FullRepository;
use crate::models::{HorseCreate, HorseId, HorseSearch, HorseUpdate, Sex};

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 4095;

const CREATE_FAILED: &str = "Validation of horse for create failed";
const UPDATE_FAILED: &str = "Validation of horse for update failed";
const GENERATIONS_FAILED: &str = "Validation of generations parameter failed";
const SEARCH_FAILED: &str = "Validation of horse search parameters failed";
const CONFLICT: &str = "Conflict with existing data";

/// Accumulated outcome of a validation run.
///
/// # Examples
///
/// ```
/// use horse_registry::services::validation::ValidationReport;
///
/// let mut report = ValidationReport::new();
/// assert!(report.is_valid());
///
/// report.add_conflict("Sex of mother has to be FEMALE");
/// assert!(!report.is_valid());
/// assert!(report.errors.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub conflicts: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a structural defect.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Record a violation of a relational invariant.
    pub fn add_conflict(&mut self, conflict: impl Into<String>) {
        self.conflicts.push(conflict.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.conflicts.is_empty()
    }

    /// Turn the report into a single failure, structural errors first.
    pub fn into_result(self, summary: &str) -> ServiceResult<()> {
        if !self.errors.is_empty() {
            return Err(ServiceError::validation(summary, self.errors));
        }
        if !self.conflicts.is_empty() {
            return Err(ServiceError::conflict(CONFLICT, self.conflicts));
        }
        Ok(())
    }
}

/// Check a requested pedigree depth against `[1, max_generations]`.
///
/// Returns the depth as the descent counter used by the pedigree builder.
pub fn validate_generations(generations: i64, max_generations: u32) -> ServiceResult<u32> {
    trace!("validate_generations({}, max={})", generations, max_generations);

    let mut report = ValidationReport::new();
    if generations < 1 {
        report.add_error("Generations must be at minimum 1");
    }
    if generations > i64::from(max_generations) {
        report.add_error(format!("Generations must not exceed {}", max_generations));
    }
    report.into_result(GENERATIONS_FAILED)?;

    // Within 1..=max_generations here.
    Ok(generations as u32)
}

/// Structural checks on search parameters.
///
/// Owner existence is not checked; a search may simply return fewer horses.
pub fn validate_for_search(search: &HorseSearch) -> ServiceResult<()> {
    trace!("validate_for_search({:?})", search);

    let mut report = ValidationReport::new();
    let too_long = |text: &Option<String>, max: usize| text.as_ref().is_some_and(|t| t.chars().count() > max);

    if too_long(&search.name, MAX_NAME_LENGTH) {
        report.add_error(format!("Search name too long: must be {} characters or fewer", MAX_NAME_LENGTH));
    }
    if too_long(&search.description, MAX_DESCRIPTION_LENGTH) {
        report.add_error(format!(
            "Search description too long: must be {} characters or fewer",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    if too_long(&search.owner_name, MAX_NAME_LENGTH) {
        report.add_error(format!("Owner name too long: must be {} characters or fewer", MAX_NAME_LENGTH));
    }
    match search.limit {
        None => report.add_error("Search limit is required"),
        Some(limit) if limit < 1 => report.add_error("Search limit must be greater or equal to 1"),
        Some(_) => {}
    }
    report.into_result(SEARCH_FAILED)
}

#[derive(Debug, Clone, Copy)]
enum ParentRole {
    Mother,
    Father,
}

impl ParentRole {
    fn label(self) -> &'static str {
        match self {
            ParentRole::Mother => "Mother",
            ParentRole::Father => "Father",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ParentRole::Mother => "mother",
            ParentRole::Father => "father",
        }
    }

    fn required_sex(self) -> Sex {
        match self {
            ParentRole::Mother => Sex::Female,
            ParentRole::Father => Sex::Male,
        }
    }

    fn possessive(self) -> &'static str {
        match self {
            ParentRole::Mother => "her",
            ParentRole::Father => "his",
        }
    }
}

/// Integrity validator over a store snapshot.
pub struct HorseValidator<'a, R: FullRepository + ?Sized> {
    repo: &'a R,
    today: NaiveDate,
}

impl<'a, R: FullRepository + ?Sized> HorseValidator<'a, R> {
    /// Validator that treats the local calendar date as "today".
    pub fn new(repo: &'a R) -> Self {
        Self::with_today(repo, Local::now().date_naive())
    }

    /// Validator with a fixed reference date.
    pub fn with_today(repo: &'a R, today: NaiveDate) -> Self {
        Self { repo, today }
    }

    /// Run every create-path check.
    ///
    /// Returns `Err` only when the store itself fails; rule violations are
    /// reported inside the [`ValidationReport`].
    pub async fn validate_for_create(&self, candidate: &HorseCreate) -> ServiceResult<ValidationReport> {
        trace!("validate_for_create({:?})", candidate);

        let mut report = ValidationReport::new();
        self.check_fields(candidate, None, &mut report).await?;

        debug!(
            "Create validation finished: {} error(s), {} conflict(s)",
            report.errors.len(),
            report.conflicts.len()
        );
        Ok(report)
    }

    /// Run every update-path check, including the cascade rules.
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - the update target does not exist
    /// * `ServiceError::Repository` - the store failed
    pub async fn validate_for_update(&self, candidate: &HorseUpdate) -> ServiceResult<ValidationReport> {
        trace!("validate_for_update({:?})", candidate);

        let existing = self
            .repo
            .get_horse(candidate.id)
            .await
            .map_err(ServiceError::from_lookup)?;
        let children = self.repo.get_children(candidate.id).await?;

        let mut report = ValidationReport::new();

        if !children.is_empty() {
            if candidate.sex.is_some_and(|sex| sex != existing.sex) {
                report.add_conflict("Cannot change sex of a horse that has children");
            }

            if let Some(dob) = candidate.date_of_birth.filter(|d| *d != existing.date_of_birth) {
                if let Some(child) = children.iter().find(|c| dob >= c.date_of_birth) {
                    debug!(
                        "New birth date {} of horse {} is not before child {} ({})",
                        dob, candidate.id, child.id, child.date_of_birth
                    );
                    report.add_conflict("Cannot change date of birth to be on or after a child's birth date");
                }
            }
        }

        self.check_fields(&candidate.as_create(), Some(candidate.id), &mut report)
            .await?;

        if candidate.delete_image.is_none() {
            report.add_error("Delete image cannot be null");
        }

        debug!(
            "Update validation of horse {} finished: {} error(s), {} conflict(s)",
            candidate.id,
            report.errors.len(),
            report.conflicts.len()
        );
        Ok(report)
    }

    /// Validate a create candidate and fold the report into a result.
    pub async fn check_create(&self, candidate: &HorseCreate) -> ServiceResult<()> {
        self.validate_for_create(candidate)
            .await?
            .into_result(CREATE_FAILED)
    }

    /// Validate an update candidate and fold the report into a result.
    pub async fn check_update(&self, candidate: &HorseUpdate) -> ServiceResult<()> {
        self.validate_for_update(candidate)
            .await?
            .into_result(UPDATE_FAILED)
    }

    /// Field and reference checks shared by both paths.
    ///
    /// `own_id` is the stored id of the horse being updated; a parent
    /// reference to it is a conflict and is not looked up.
    async fn check_fields(
        &self,
        horse: &HorseCreate,
        own_id: Option<HorseId>,
        report: &mut ValidationReport,
    ) -> ServiceResult<()> {
        self.check_structure(horse, report);

        if let Some(owner_id) = horse.owner_id {
            if !self.repo.owner_exists(owner_id).await? {
                report.add_error(format!("Owner with ID {} does not exist", owner_id));
            }
        }

        for (role, parent_id) in [
            (ParentRole::Mother, horse.mother_id),
            (ParentRole::Father, horse.father_id),
        ] {
            let Some(parent_id) = parent_id else { continue };
            if own_id == Some(parent_id) {
                report.add_conflict(format!("Horse cannot be its own {}", role.name()));
                continue;
            }
            self.check_parent(role, parent_id, horse.date_of_birth, report)
                .await?;
        }
        Ok(())
    }

    fn check_structure(&self, horse: &HorseCreate, report: &mut ValidationReport) {
        match horse.name.as_deref() {
            None => report.add_error("Horse name is required and cannot be empty"),
            Some(name) => {
                if name.trim().is_empty() {
                    report.add_error("Horse name is required and cannot be empty");
                }
                if name.chars().count() > MAX_NAME_LENGTH {
                    report.add_error(format!(
                        "Horse name too long: longer than {} characters",
                        MAX_NAME_LENGTH
                    ));
                }
            }
        }

        if let Some(description) = horse.description.as_deref() {
            if description.trim().is_empty() {
                report.add_error("Horse description is given but blank");
            }
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                report.add_error(format!(
                    "Horse description too long: longer than {} characters",
                    MAX_DESCRIPTION_LENGTH
                ));
            }
        }

        match horse.date_of_birth {
            None => report.add_error("Horse birth date is required"),
            Some(dob) if dob > self.today => {
                report.add_error("Horse birth date cannot be in the future")
            }
            Some(_) => {}
        }

        if horse.sex.is_none() {
            report.add_error("Sex is required");
        }
    }

    async fn check_parent(
        &self,
        role: ParentRole,
        parent_id: HorseId,
        child_dob: Option<NaiveDate>,
        report: &mut ValidationReport,
    ) -> ServiceResult<()> {
        let parent = match self.repo.get_horse(parent_id).await {
            Ok(parent) => parent,
            Err(e) if e.is_not_found() => {
                report.add_error(format!("{} with ID {} does not exist", role.label(), parent_id));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if parent.sex != role.required_sex() {
            report.add_conflict(format!(
                "Sex of {} has to be {}",
                role.name(),
                role.required_sex()
            ));
        }
        if let Some(dob) = child_dob {
            if dob <= parent.date_of_birth {
                report.add_conflict(format!(
                    "{} has to be older than {} child",
                    role.label(),
                    role.possessive()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod validation_tests;
