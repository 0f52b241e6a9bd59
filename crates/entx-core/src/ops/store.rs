use chrono::Utc;
use std::collections::HashMap;

use super::repository::{EntityHistory, EntityRepository, NewDef};
use crate::errors::{EntityError, Result};
use crate::model::{Actor, Audit, AuditAction, Dataset, Def, Entity, LABEL_KEY};
use crate::rules::validate_dataset;

/// In-memory persistence collaborator
///
/// HashMap-backed and single-threaded; callers needing shared access wrap it
/// in their own lock. Def ids come from one sequence shared by all entities.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) datasets: HashMap<String, Dataset>,
    pub(crate) entities: HashMap<String, Entity>,
    /// Audit trail per entity uuid
    pub(crate) audits: HashMap<String, Vec<Audit>>,
    next_def_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset, replacing any previous one with the same name
    ///
    /// # Errors
    ///
    /// `ReservedPropertyName` if a property would render onto a system key.
    pub fn create_dataset(&mut self, dataset: Dataset) -> Result<()> {
        validate_dataset(&dataset)?;
        self.datasets.insert(dataset.name.clone(), dataset);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatasetNotFound` if no dataset has this name.
    pub fn get_dataset(&self, name: &str) -> Result<&Dataset> {
        self.datasets
            .get(name)
            .ok_or_else(|| EntityError::DatasetNotFound {
                dataset: name.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `EntityNotFound` if no entity has this uuid.
    pub fn get_entity(&self, uuid: &str) -> Result<&Entity> {
        self.entities
            .get(uuid)
            .ok_or_else(|| EntityError::EntityNotFound {
                uuid: uuid.to_string(),
            })
    }

    /// Audit trail of an entity, oldest first
    pub fn audits_for(&self, uuid: &str) -> &[Audit] {
        self.audits.get(uuid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Create an entity with `def` as version 1 and record the creation audit
    ///
    /// # Errors
    ///
    /// - `DatasetNotFound` if `dataset` is not registered
    /// - `EntityAlreadyExists` if the uuid is taken
    /// - `InvalidBaseVersion` if `def` carries a base version
    /// - `EntityDataInvalid` if `def.data_received` disagrees with `def`
    pub fn create_entity(
        &mut self,
        dataset: &str,
        uuid: &str,
        creator: &Actor,
        def: NewDef,
    ) -> Result<Def> {
        self.get_dataset(dataset)?;
        if self.entities.contains_key(uuid) {
            return Err(EntityError::EntityAlreadyExists {
                uuid: uuid.to_string(),
            });
        }
        if def.base_version.is_some() {
            return Err(EntityError::InvalidBaseVersion {
                version: 1,
                base_version: def.base_version,
            });
        }
        check_received(&def)?;

        let now = Utc::now();
        let stored = Def {
            id: self.allocate_def_id(),
            version: 1,
            label: def.label,
            data: def.data,
            data_received: def.data_received,
            base_version: None,
            conflicting_properties: None,
        };

        self.entities.insert(
            uuid.to_string(),
            Entity {
                uuid: uuid.to_string(),
                dataset: dataset.to_string(),
                creator: creator.clone(),
                created_at: now,
                updated_at: None,
                defs: vec![stored.clone()],
            },
        );
        self.audits.entry(uuid.to_string()).or_default().push(
            Audit::new(AuditAction::Create, stored.id, now).with_actor(creator.id.as_str()),
        );

        Ok(stored)
    }

    /// Append `def` as the next version and record the update audit
    ///
    /// # Errors
    ///
    /// As [`EntityRepository::append_def`].
    pub fn update_entity(&mut self, uuid: &str, actor: &Actor, def: NewDef) -> Result<Def> {
        let stored = self.append_def(uuid, def)?;
        self.audits.entry(uuid.to_string()).or_default().push(
            Audit::new(AuditAction::Update, stored.id, Utc::now()).with_actor(actor.id.as_str()),
        );
        Ok(stored)
    }

    /// Record that `actor` resolved the conflict on the current version
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if no entity has this uuid.
    pub fn resolve_conflict(&mut self, uuid: &str, actor: &Actor) -> Result<()> {
        let def_id = self.get_entity(uuid)?.current()?.id;
        self.audits.entry(uuid.to_string()).or_default().push(
            Audit::new(AuditAction::UpdateResolve, def_id, Utc::now())
                .with_actor(actor.id.as_str()),
        );
        Ok(())
    }

    /// Load an already-recorded history, e.g. one exported from another store
    ///
    /// The dataset is registered as well. Def ids issued afterwards continue
    /// past the highest imported id.
    ///
    /// # Errors
    ///
    /// `ReservedPropertyName` for an unusable dataset, `EntityAlreadyExists`
    /// if the uuid is taken.
    pub fn import_history(&mut self, dataset: Dataset, history: EntityHistory) -> Result<()> {
        validate_dataset(&dataset)?;
        let uuid = history.entity.uuid.clone();
        if self.entities.contains_key(&uuid) {
            return Err(EntityError::EntityAlreadyExists { uuid });
        }

        let max_id = history.entity.defs.iter().map(|d| d.id).max().unwrap_or(0);
        self.next_def_id = self.next_def_id.max(max_id);
        self.datasets.insert(dataset.name.clone(), dataset);
        self.audits.insert(uuid.clone(), history.audits);
        self.entities.insert(uuid, history.entity);
        Ok(())
    }

    fn allocate_def_id(&mut self) -> i64 {
        self.next_def_id += 1;
        self.next_def_id
    }
}

// data_received must be a sub-map of data, plus the label under LABEL_KEY
fn check_received(def: &NewDef) -> Result<()> {
    let mut received = def.data_received.clone();
    let label_matches = received
        .remove(LABEL_KEY)
        .map_or(true, |label| label == def.label);
    if label_matches && received.is_subset_of(&def.data) {
        return Ok(());
    }
    Err(EntityError::invalid(
        "The received values disagree with the resolved entity data.",
    ))
}

impl EntityRepository for MemoryStore {
    fn append_def(&mut self, uuid: &str, def: NewDef) -> Result<Def> {
        let current_version = self.get_entity(uuid)?.current()?.version;
        let version = current_version + 1;

        let base = match def.base_version {
            Some(base) if base >= 1 => base,
            other => {
                return Err(EntityError::InvalidBaseVersion {
                    version,
                    base_version: other,
                })
            }
        };
        check_received(&def)?;
        if base > current_version {
            return Err(EntityError::BaseVersionNotFound {
                uuid: uuid.to_string(),
                base_version: base,
            });
        }

        let stored = Def {
            id: self.allocate_def_id(),
            version,
            label: def.label,
            data: def.data,
            data_received: def.data_received,
            base_version: Some(base),
            conflicting_properties: None,
        };

        let entity = self
            .entities
            .get_mut(uuid)
            .ok_or_else(|| EntityError::EntityNotFound {
                uuid: uuid.to_string(),
            })?;
        entity.defs.push(stored.clone());
        entity.updated_at = Some(Utc::now());

        Ok(stored)
    }

    fn fetch_history(&self, uuid: &str) -> Result<EntityHistory> {
        Ok(EntityHistory {
            entity: self.get_entity(uuid)?.clone(),
            audits: self.audits_for(uuid).to_vec(),
        })
    }

    fn fetch_dataset(&self, name: &str) -> Result<Dataset> {
        self.get_dataset(name).cloned()
    }
}
