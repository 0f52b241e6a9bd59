pub mod classify;
pub mod diff;
pub mod project;
pub mod validate;

use anyhow::Context;
use entx_core::model::Dataset;
use entx_core::ops::EntityHistory;
use entx_core::MemoryStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk export of one entity: its dataset, defs and audit trail
#[derive(Debug, Deserialize)]
pub struct HistoryFile {
    pub dataset: Dataset,
    #[serde(flatten)]
    pub history: EntityHistory,
}

/// Read a history export into a fresh store; returns the store and the entity uuid
pub fn load_history(path: &Path) -> anyhow::Result<(MemoryStore, String)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file '{}'", path.display()))?;
    let file: HistoryFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse history file '{}'", path.display()))?;

    let uuid = file.history.entity.uuid.clone();
    let mut store = MemoryStore::new();
    store.import_history(file.dataset, file.history)?;
    Ok((store, uuid))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
