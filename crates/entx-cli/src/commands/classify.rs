//! Classify command
//!
//! Usage: entx classify <HISTORY> [--only-conflicting]

use clap::Args;
use entx_core::ops::entity_ops;
use entx_core::EngineConfig;
use entx_core_types::RequestContext;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// History export (JSON)
    pub history: PathBuf,

    /// Only list the versions involved in a conflict
    #[arg(long)]
    pub only_conflicting: bool,
}

pub fn execute(args: ClassifyArgs, config: &EngineConfig) -> anyhow::Result<()> {
    let (store, uuid) = super::load_history(&args.history)?;
    let versions = entity_ops::list_versions(
        &store,
        &uuid,
        args.only_conflicting,
        config.classifier.creation_audit,
        &RequestContext::new(),
    )?;
    super::print_json(&versions)
}
