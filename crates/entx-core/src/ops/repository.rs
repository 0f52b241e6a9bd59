use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::{Audit, Dataset, Def, Entity, PropertyMap};

/// An edit ready to be stored as the next version of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDef {
    pub label: String,
    pub data: PropertyMap,
    pub data_received: PropertyMap,
    /// `None` only when creating the entity
    pub base_version: Option<u32>,
}

/// Everything the classifier needs about one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHistory {
    pub entity: Entity,
    #[serde(default)]
    pub audits: Vec<Audit>,
}

/// Persistence collaborator contract
///
/// Implementations own version assignment. `append_def` takes `&mut self`, so
/// a single repository value serializes appends for every entity it holds.
pub trait EntityRepository {
    /// Store `def` as the next version of entity `uuid`
    ///
    /// # Errors
    ///
    /// `EntityNotFound`, `InvalidBaseVersion` for a missing base, or
    /// `BaseVersionNotFound` when the base is newer than the current version.
    fn append_def(&mut self, uuid: &str, def: NewDef) -> Result<Def>;

    /// The entity with its complete ordered defs and its audit trail
    ///
    /// # Errors
    ///
    /// `EntityNotFound` if no entity has this uuid.
    fn fetch_history(&self, uuid: &str) -> Result<EntityHistory>;

    /// # Errors
    ///
    /// `DatasetNotFound` if no dataset has this name.
    fn fetch_dataset(&self, name: &str) -> Result<Dataset>;
}
