//! Horse operations exposed to callers.
//!
//! These functions work with any [`FullRepository`] and contain the business
//! rules that must hold regardless of the storage backend: every write passes
//! the integrity validator first, and read projections resolve their
//! references.
//!
//! # Concurrency
//!
//! Validation reads and the subsequent write are separate store calls. A
//! concurrent writer can invalidate a passed check (for example by deleting a
//! referenced parent) before the write lands. Deployments with concurrent
//! writers must run validate-then-write inside one unit of work owned by the
//! store.

use log::{debug, error, info, trace, warn};

use super::error::{ServiceError, ServiceResult};
use super::pedigree::PedigreeBuilder;
use super::validation::{validate_for_search, HorseValidator};
use crate::config::PedigreeSettings;
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{
    FamilyTreeNode, Horse, HorseCreate, HorseDetail, HorseId, HorseParent, HorseSearch, HorseUpdate,
    NewHorse, OwnerSummary,
};

// ==================== Health ====================

/// Check if the store is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<bool> {
    Ok(repo.health_check().await?)
}

// ==================== Reads ====================

/// All stored horses ordered by id.
pub async fn list_horses<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<Vec<Horse>> {
    trace!("list_horses()");
    let horses = repo.list_horses().await?;
    debug!("Listed {} horse(s)", horses.len());
    Ok(horses)
}

/// Horses matching `search`.
///
/// A search without any parameter lists every horse. Otherwise the parameters
/// are validated first and `limit` is required.
///
/// # Errors
/// * `ServiceError::Validation` - oversized text filters or a missing or non-positive limit
pub async fn search_horses<R: FullRepository + ?Sized>(repo: &R, search: &HorseSearch) -> ServiceResult<Vec<Horse>> {
    if search.is_empty() {
        return list_horses(repo).await;
    }

    trace!("search_horses({:?})", search);
    validate_for_search(search).inspect_err(|e| warn!("Horse search rejected: {}", e))?;
    let horses = repo.search_horses(search).await?;
    debug!("Search returned {} horse(s)", horses.len());
    Ok(horses)
}

/// Horse with owner and immediate parents resolved.
///
/// # Errors
/// * `ServiceError::NotFound` - no horse with `id`
/// * `ServiceError::Fatal` - a stored owner or parent reference no longer resolves
pub async fn get_horse_detail<R: FullRepository + ?Sized>(repo: &R, id: HorseId) -> ServiceResult<HorseDetail> {
    trace!("get_horse_detail({})", id);
    let horse = repo.get_horse(id).await.map_err(ServiceError::from_lookup)?;
    detail_of(repo, horse).await
}

/// Pedigree of `horse_id` covering `generations` generations.
///
/// # Errors
/// * `ServiceError::Validation` - `generations` outside `[1, settings.max_generations]`
/// * `ServiceError::NotFound` - no horse with `horse_id`
/// * `ServiceError::Fatal` - a parent reference inside the tree no longer resolves
pub async fn get_family_tree<R: FullRepository + ?Sized>(
    repo: &R,
    settings: PedigreeSettings,
    horse_id: HorseId,
    generations: i64,
) -> ServiceResult<FamilyTreeNode> {
    PedigreeBuilder::new(repo, settings)
        .build_tree(horse_id, generations)
        .await
        .inspect_err(|e| {
            if e.is_validation() || e.is_not_found() {
                warn!("Family tree of horse {} rejected: {}", horse_id, e);
            }
        })
}

// ==================== Writes ====================

/// Validate and store a new horse.
///
/// # Errors
/// * `ServiceError::Validation` - structural defects, including unknown owner or parents
/// * `ServiceError::Conflict` - parent sex or age mismatches
pub async fn create_horse<R: FullRepository + ?Sized>(repo: &R, candidate: HorseCreate) -> ServiceResult<HorseDetail> {
    trace!("create_horse({:?})", candidate);

    HorseValidator::new(repo)
        .check_create(&candidate)
        .await
        .inspect_err(|e| warn!("Rejected horse create: {}", e))?;

    let stored = repo.create_horse(validated(candidate)?).await?;
    info!("Created horse {} ('{}')", stored.id, stored.name);
    detail_of(repo, stored).await
}

/// Validate and replace a stored horse wholesale.
///
/// # Errors
/// * `ServiceError::NotFound` - the target does not exist
/// * `ServiceError::Validation` - structural defects
/// * `ServiceError::Conflict` - parent mismatches or a change forbidden by existing children
pub async fn update_horse<R: FullRepository + ?Sized>(repo: &R, candidate: HorseUpdate) -> ServiceResult<HorseDetail> {
    trace!("update_horse({:?})", candidate);

    HorseValidator::new(repo)
        .check_update(&candidate)
        .await
        .inspect_err(|e| warn!("Rejected update of horse {}: {}", candidate.id, e))?;

    if candidate.delete_image == Some(true) {
        debug!("Horse {} requested image removal; no image is stored", candidate.id);
    }

    let id = candidate.id;
    let stored = repo
        .update_horse(id, validated(candidate.as_create())?)
        .await
        .map_err(ServiceError::from_lookup)?;
    info!("Updated horse {} ('{}')", stored.id, stored.name);
    detail_of(repo, stored).await
}

/// Delete a horse; children keep existing with the parent reference cleared.
pub async fn delete_horse<R: FullRepository + ?Sized>(repo: &R, id: HorseId) -> ServiceResult<()> {
    trace!("delete_horse({})", id);
    repo.delete_horse(id).await.map_err(ServiceError::from_lookup)?;
    info!("Deleted horse {}", id);
    Ok(())
}

// ==================== Helpers ====================

fn validated(candidate: HorseCreate) -> ServiceResult<NewHorse> {
    NewHorse::try_from(candidate).map_err(|e| ServiceError::Fatal(e.to_string()))
}

async fn detail_of<R: FullRepository + ?Sized>(repo: &R, horse: Horse) -> ServiceResult<HorseDetail> {
    let owner = match horse.owner_id {
        Some(owner_id) => {
            let owner = repo
                .get_owner(owner_id)
                .await
                .map_err(|e| dangling(e, &horse, "owner"))?;
            Some(OwnerSummary::from(&owner))
        }
        None => None,
    };

    let mother = parent_summary(repo, &horse, horse.mother_id, "mother").await?;
    let father = parent_summary(repo, &horse, horse.father_id, "father").await?;

    Ok(HorseDetail {
        id: horse.id,
        name: horse.name,
        description: horse.description,
        date_of_birth: horse.date_of_birth,
        sex: horse.sex,
        owner,
        mother,
        father,
    })
}

async fn parent_summary<R: FullRepository + ?Sized>(
    repo: &R,
    horse: &Horse,
    parent_id: Option<HorseId>,
    role: &str,
) -> ServiceResult<Option<HorseParent>> {
    match parent_id {
        Some(parent_id) => repo
            .get_parent_summary(parent_id)
            .await
            .map(Some)
            .map_err(|e| dangling(e, horse, role)),
        None => Ok(None),
    }
}

fn dangling(err: RepositoryError, horse: &Horse, role: &str) -> ServiceError {
    if err.is_not_found() {
        error!("Horse {} has a dangling {} reference: {}", horse.id, role, err);
        ServiceError::Fatal(format!("{} of horse {} could not be resolved", role, horse.id))
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::models::Sex;
    use chrono::NaiveDate;

    fn candidate(name: &str, year: i32, sex: Sex) -> HorseCreate {
        HorseCreate {
            name: Some(name.to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(year, 4, 1),
            sex: Some(sex),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_resolves_detail() {
        let repo = LocalRepository::new();
        let owner = repo.store_owner_impl("Ada", "Lovelace", None);
        let mare = create_horse(&repo, candidate("Mare", 2010, Sex::Female)).await.unwrap();

        let mut foal = candidate("Foal", 2018, Sex::Male);
        foal.mother_id = Some(mare.id);
        foal.owner_id = Some(owner.id);
        let detail = create_horse(&repo, foal).await.unwrap();

        assert_eq!(detail.mother.as_ref().map(|m| m.name.as_str()), Some("Mare"));
        assert_eq!(detail.owner.as_ref().map(|o| o.last_name.as_str()), Some("Lovelace"));
        assert!(detail.father.is_none());
    }

    #[tokio::test]
    async fn test_search_validates_unless_empty() {
        let repo = LocalRepository::new();
        create_horse(&repo, candidate("Mare", 2010, Sex::Female)).await.unwrap();
        create_horse(&repo, candidate("Stallion", 2009, Sex::Male)).await.unwrap();

        assert_eq!(search_horses(&repo, &HorseSearch::default()).await.unwrap().len(), 2);

        let unlimited = HorseSearch {
            sex: Some(Sex::Male),
            ..Default::default()
        };
        let calls = repo.store_calls();
        assert!(search_horses(&repo, &unlimited).await.unwrap_err().is_validation());
        assert_eq!(repo.store_calls(), calls);

        let males = HorseSearch {
            limit: Some(10),
            ..unlimited
        };
        let found = search_horses(&repo, &males).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Stallion");
    }

    #[tokio::test]
    async fn test_rejected_create_does_not_write() {
        let repo = LocalRepository::new();
        let err = create_horse(&repo, HorseCreate::default()).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repo.horse_count(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = LocalRepository::new();
        let horse = create_horse(&repo, candidate("Old", 2012, Sex::Female)).await.unwrap();

        let mut body = candidate("New", 2012, Sex::Female);
        body.description = Some("Renamed".to_string());
        let detail = update_horse(&repo, HorseUpdate::from_create(horse.id, body, Some(true)))
            .await
            .unwrap();

        assert_eq!(detail.id, horse.id);
        assert_eq!(detail.name, "New");
        assert_eq!(detail.description.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_detail_with_dangling_parent_is_fatal() {
        let repo = LocalRepository::new();
        let mut horse = NewHorse::try_from(candidate("Orphan", 2015, Sex::Male))
            .unwrap()
            .into_horse(HorseId(1));
        horse.father_id = Some(HorseId(9));
        repo.insert_horse_impl(horse);

        assert!(get_horse_detail(&repo, HorseId(1)).await.unwrap_err().is_fatal());
        assert!(get_horse_detail(&repo, HorseId(2)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_clears_parent_in_pedigree() {
        let repo = LocalRepository::new();
        let mare = create_horse(&repo, candidate("Mare", 2010, Sex::Female)).await.unwrap();
        let mut body = candidate("Foal", 2018, Sex::Male);
        body.mother_id = Some(mare.id);
        let foal = create_horse(&repo, body).await.unwrap();

        delete_horse(&repo, mare.id).await.unwrap();

        let tree = get_family_tree(&repo, PedigreeSettings::default(), foal.id, 3)
            .await
            .unwrap();
        assert!(tree.mother.is_none());
        assert!(delete_horse(&repo, mare.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_and_health() {
        let repo = LocalRepository::new();
        create_horse(&repo, candidate("One", 2011, Sex::Male)).await.unwrap();
        create_horse(&repo, candidate("Two", 2012, Sex::Female)).await.unwrap();

        let names: Vec<_> = list_horses(&repo).await.unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["One", "Two"]);
        assert!(health_check(&repo).await.unwrap());
    }
}
