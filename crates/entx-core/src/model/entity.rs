use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::def::Def;
use crate::conflict::{self, ConflictType};
use crate::errors::{EntityError, Result};

/// The user that created an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A versioned record belonging to one dataset
///
/// `defs` is the complete, ascending version history. Conflict status is not
/// stored; [`Entity::conflict`] derives it from the history on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Canonical (lower-case, unprefixed) uuid
    pub uuid: String,
    pub dataset: String,
    pub creator: Actor,
    pub created_at: DateTime<Utc>,
    /// Time of the latest update; `None` until version 2 exists
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub defs: Vec<Def>,
}

impl Entity {
    /// The latest version
    ///
    /// # Errors
    ///
    /// `VersionSequenceBroken` if the entity has no defs at all.
    pub fn current(&self) -> Result<&Def> {
        self.defs
            .last()
            .ok_or(EntityError::VersionSequenceBroken {
                position: 0,
                expected: 1,
                found: 0,
            })
    }

    /// Number of edits after creation
    pub fn updates(&self) -> usize {
        self.defs.len().saturating_sub(1)
    }

    /// Most severe conflict class across the history
    ///
    /// # Errors
    ///
    /// Propagates history precondition failures from the classifier.
    pub fn conflict(&self) -> Result<ConflictType> {
        let classified = conflict::classify(&self.defs)?;
        Ok(classified
            .iter()
            .map(|v| v.conflict)
            .max()
            .unwrap_or(ConflictType::None))
    }
}
