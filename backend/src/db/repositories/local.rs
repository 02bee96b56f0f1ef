//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using `BTreeMap`s behind a single lock, providing fast,
//! deterministic, and isolated execution.

use async_trait::async_trait;
use log::{debug, trace, warn};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{Horse, HorseId, HorseParent, HorseSearch, NewHorse, Owner, OwnerId};

/// In-memory local repository.
///
/// Clones share the same underlying data.
///
/// # Example
/// ```
/// use horse_registry::db::repositories::LocalRepository;
/// use horse_registry::db::repository::HorseRepository;
///
/// # async fn example() {
/// let repo = LocalRepository::new();
/// let owner = repo.store_owner_impl("Ada", "Lovelace", None);
///
/// let horses = repo.list_horses().await.unwrap();
/// assert!(horses.is_empty());
/// # let _ = owner;
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    calls: Arc<AtomicUsize>,
}

struct LocalData {
    horses: BTreeMap<HorseId, Horse>,
    owners: BTreeMap<OwnerId, Owner>,

    // ID counters
    next_horse_id: i64,
    next_owner_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            horses: BTreeMap::new(),
            owners: BTreeMap::new(),
            next_horse_id: 1,
            next_owner_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add an owner to the repository and return it with its assigned ID.
    pub fn store_owner_impl(
        &self,
        first_name: &str,
        last_name: &str,
        description: Option<&str>,
    ) -> Owner {
        let mut data = self.data.write();
        let id = OwnerId(data.next_owner_id);
        data.next_owner_id += 1;

        let owner = Owner {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            description: description.map(str::to_string),
        };
        data.owners.insert(id, owner.clone());
        owner
    }

    /// Insert a horse verbatim, keeping its ID.
    ///
    /// Bypasses every integrity rule; intended for setting up fixtures,
    /// including deliberately inconsistent ones.
    pub fn insert_horse_impl(&self, horse: Horse) {
        let mut data = self.data.write();
        data.next_horse_id = data.next_horse_id.max(horse.id.value() + 1);
        data.horses.insert(horse.id, horse);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Get the number of horses stored.
    pub fn horse_count(&self) -> usize {
        self.data.read().horses.len()
    }

    /// Number of trait calls served so far.
    pub fn store_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Count the call and fail if the repository is marked unhealthy.
    fn enter(&self, operation: &str) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        trace!("LocalRepository::{}", operation);
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Store is not healthy").with_operation(operation));
        }
        Ok(())
    }

    fn horse_not_found(operation: &str, id: HorseId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("No horse with ID {} found", id),
            ErrorContext::new(operation)
                .with_entity("horse")
                .with_entity_id(id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HorseRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.data.read().is_healthy)
    }

    async fn get_horse(&self, id: HorseId) -> RepositoryResult<Horse> {
        self.enter("get_horse")?;
        self.data
            .read()
            .horses
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::horse_not_found("get_horse", id))
    }

    async fn get_parent_summary(&self, id: HorseId) -> RepositoryResult<HorseParent> {
        self.enter("get_parent_summary")?;
        self.data
            .read()
            .horses
            .get(&id)
            .map(HorseParent::from)
            .ok_or_else(|| Self::horse_not_found("get_parent_summary", id))
    }

    async fn get_children(&self, parent_id: HorseId) -> RepositoryResult<Vec<Horse>> {
        self.enter("get_children")?;
        let data = self.data.read();
        let children: Vec<Horse> = data
            .horses
            .values()
            .filter(|h| h.mother_id == Some(parent_id) || h.father_id == Some(parent_id))
            .cloned()
            .collect();
        debug!("Found {} children for horse {}", children.len(), parent_id);
        Ok(children)
    }

    async fn list_horses(&self) -> RepositoryResult<Vec<Horse>> {
        self.enter("list_horses")?;
        Ok(self.data.read().horses.values().cloned().collect())
    }

    async fn search_horses(&self, search: &HorseSearch) -> RepositoryResult<Vec<Horse>> {
        self.enter("search_horses")?;
        let data = self.data.read();
        let limit = search
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(0));

        let horses: Vec<Horse> = data
            .horses
            .values()
            .filter(|h| {
                let owner = h.owner_id.and_then(|id| data.owners.get(&id));
                search.matches(h, owner)
            })
            .take(limit)
            .cloned()
            .collect();
        debug!("Search matched {} horse(s)", horses.len());
        Ok(horses)
    }

    async fn create_horse(&self, horse: NewHorse) -> RepositoryResult<Horse> {
        self.enter("create_horse")?;
        let mut data = self.data.write();
        let id = HorseId(data.next_horse_id);
        data.next_horse_id += 1;

        let horse = horse.into_horse(id);
        data.horses.insert(id, horse.clone());
        debug!("Stored horse {} ('{}')", id, horse.name);
        Ok(horse)
    }

    async fn update_horse(&self, id: HorseId, horse: NewHorse) -> RepositoryResult<Horse> {
        self.enter("update_horse")?;
        let mut data = self.data.write();
        let slot = data
            .horses
            .get_mut(&id)
            .ok_or_else(|| Self::horse_not_found("update_horse", id))?;

        *slot = horse.into_horse(id);
        Ok(slot.clone())
    }

    async fn delete_horse(&self, id: HorseId) -> RepositoryResult<()> {
        self.enter("delete_horse")?;
        let mut data = self.data.write();
        if data.horses.remove(&id).is_none() {
            return Err(Self::horse_not_found("delete_horse", id));
        }

        let mut orphaned = 0;
        for child in data.horses.values_mut() {
            if child.mother_id == Some(id) {
                child.mother_id = None;
                orphaned += 1;
            }
            if child.father_id == Some(id) {
                child.father_id = None;
                orphaned += 1;
            }
        }
        if orphaned > 0 {
            warn!("Deleted horse {} was referenced as parent {} time(s); references cleared", id, orphaned);
        }
        Ok(())
    }
}

#[async_trait]
impl OwnerRepository for LocalRepository {
    async fn owner_exists(&self, id: OwnerId) -> RepositoryResult<bool> {
        self.enter("owner_exists")?;
        Ok(self.data.read().owners.contains_key(&id))
    }

    async fn get_owner(&self, id: OwnerId) -> RepositoryResult<Owner> {
        self.enter("get_owner")?;
        self.data.read().owners.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("No owner with ID {} found", id),
                ErrorContext::new("get_owner")
                    .with_entity("owner")
                    .with_entity_id(id),
            )
        })
    }
}
