//! Diff command
//!
//! Usage: entx diff <HISTORY>

use clap::Args;
use entx_core::ops::entity_ops;
use entx_core_types::RequestContext;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// History export (JSON)
    pub history: PathBuf,
}

pub fn execute(args: DiffArgs) -> anyhow::Result<()> {
    let (store, uuid) = super::load_history(&args.history)?;
    let diffs = entity_ops::version_diffs(&store, &uuid, &RequestContext::new())?;
    super::print_json(&diffs)
}
