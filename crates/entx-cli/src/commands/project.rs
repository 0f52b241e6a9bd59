//! Project command
//!
//! Usage: entx project <HISTORY> [--select <QUERY>]

use clap::Args;
use entx_core::ops::entity_ops;
use entx_core_types::RequestContext;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// History export (JSON)
    pub history: PathBuf,

    /// `$select` query, e.g. `__id,label,__system/version`
    #[arg(short, long)]
    pub select: Option<String>,
}

pub fn execute(args: ProjectArgs) -> anyhow::Result<()> {
    let (store, uuid) = super::load_history(&args.history)?;
    let view = entity_ops::read_entity(
        &store,
        &uuid,
        args.select.as_deref(),
        &RequestContext::new(),
    )?;
    super::print_json(&view)
}
