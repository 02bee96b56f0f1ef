//! Depth-bounded ancestry tree construction.
//!
//! The tree is rebuilt from the store on every request. Depth is bounded by
//! an explicit counter that starts at the validated `generations` value and is
//! decremented on every descent, so at most `2^generations - 1` nodes are
//! produced.

use futures::future::{BoxFuture, FutureExt};
use log::{debug, error, info, trace};

use super::error::{ServiceError, ServiceResult};
use super::validation::validate_generations;
use crate::config::PedigreeSettings;
use crate::db::repository::FullRepository;
use crate::models::{FamilyTreeNode, Horse, HorseId};

/// Builds [`FamilyTreeNode`] pedigrees against a store.
pub struct PedigreeBuilder<'a, R: FullRepository + ?Sized> {
    repo: &'a R,
    settings: PedigreeSettings,
}

impl<'a, R: FullRepository + ?Sized> PedigreeBuilder<'a, R> {
    pub fn new(repo: &'a R, settings: PedigreeSettings) -> Self {
        Self { repo, settings }
    }

    /// Build the pedigree of `root_id` covering `generations` generations.
    ///
    /// The depth is validated before the store is touched.
    ///
    /// # Errors
    /// * `ServiceError::Validation` - `generations` outside `[1, max_generations]`
    /// * `ServiceError::NotFound` - the root horse does not exist
    /// * `ServiceError::Fatal` - a stored parent reference no longer resolves
    pub async fn build_tree(&self, root_id: HorseId, generations: i64) -> ServiceResult<FamilyTreeNode> {
        trace!("build_tree({}, {})", root_id, generations);
        let remaining = validate_generations(generations, self.settings.max_generations)?;

        let root = self
            .repo
            .get_horse(root_id)
            .await
            .map_err(ServiceError::from_lookup)?;

        let tree = self.build_node(root, remaining).await?;
        info!(
            "Built pedigree of horse {} with {} generation(s), {} node(s)",
            root_id,
            tree.generations(),
            tree.node_count()
        );
        Ok(tree)
    }

    fn build_node(&self, horse: Horse, remaining: u32) -> BoxFuture<'_, ServiceResult<FamilyTreeNode>> {
        async move {
            let mut node = FamilyTreeNode::leaf(&horse);
            if remaining <= 1 {
                return Ok(node);
            }

            if let Some(mother_id) = horse.mother_id {
                let mother = self.resolve_parent(horse.id, mother_id).await?;
                node.mother = Some(Box::new(self.build_node(mother, remaining - 1).await?));
            }
            if let Some(father_id) = horse.father_id {
                let father = self.resolve_parent(horse.id, father_id).await?;
                node.father = Some(Box::new(self.build_node(father, remaining - 1).await?));
            }
            Ok(node)
        }
        .boxed()
    }

    async fn resolve_parent(&self, child_id: HorseId, parent_id: HorseId) -> ServiceResult<Horse> {
        match self.repo.get_horse(parent_id).await {
            Ok(parent) => {
                debug!("Resolved parent {} of horse {}", parent_id, child_id);
                Ok(parent)
            }
            Err(e) if e.is_not_found() => {
                error!(
                    "Horse {} references parent {} which does not exist",
                    child_id, parent_id
                );
                Err(ServiceError::Fatal(format!(
                    "Parent {} of horse {} could not be resolved",
                    parent_id, child_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "pedigree_tests.rs"]
mod pedigree_tests;
