use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance action recorded against a def
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "entity.create")]
    Create,
    #[serde(rename = "entity.update.version")]
    Update,
    /// Manual conflict resolution
    #[serde(rename = "entity.update.resolve")]
    UpdateResolve,
}

/// Immutable provenance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub action: AuditAction,
    pub entity_def_id: i64,
    #[serde(default)]
    pub actor_id: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl Audit {
    pub fn new(action: AuditAction, entity_def_id: i64, logged_at: DateTime<Utc>) -> Self {
        Self {
            action,
            entity_def_id,
            actor_id: None,
            logged_at,
        }
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn is_creation_of(&self, def_id: i64) -> bool {
        self.action == AuditAction::Create && self.entity_def_id == def_id
    }
}
