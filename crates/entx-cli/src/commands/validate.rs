//! Validate command
//!
//! Usage: entx validate request <BODY> --properties <NAMES> [--existing <HISTORY>]

use anyhow::Context;
use clap::{Args, Subcommand};
use entx_core::extract::extract_from_request;
use entx_core::rules::canonical_uuid;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub command: ValidateCommand,
}

#[derive(Debug, Subcommand)]
pub enum ValidateCommand {
    /// Check an API request body against a dataset's properties
    Request(ValidateRequestArgs),
}

#[derive(Debug, Args)]
pub struct ValidateRequestArgs {
    /// Request body (JSON file)
    pub body: PathBuf,

    /// Dataset property names, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub properties: Vec<String>,

    /// Treat the body as an update of the entity in this history export
    #[arg(long)]
    pub existing: Option<PathBuf>,
}

pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    match args.command {
        ValidateCommand::Request(request_args) => execute_validate_request(request_args),
    }
}

fn execute_validate_request(args: ValidateRequestArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.body)
        .with_context(|| format!("failed to read request body '{}'", args.body.display()))?;
    let body: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse request body '{}'", args.body.display()))?;

    let existing = match &args.existing {
        Some(path) => {
            let (store, uuid) = super::load_history(path)?;
            Some(store.get_entity(&uuid)?.clone())
        }
        None => None,
    };

    let properties: Vec<&str> = args.properties.iter().map(String::as_str).collect();
    let extracted = extract_from_request(&body, &properties, existing.as_ref())?;
    let uuid = canonical_uuid(&extracted.system.uuid)?;

    super::print_json(&json!({
        "uuid": uuid,
        "label": extracted.system.label,
        "data": extracted.data,
        "dataReceived": extracted.data_received,
    }))
}
