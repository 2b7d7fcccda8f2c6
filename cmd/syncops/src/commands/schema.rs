//! Schema command implementation.

use anyhow::Result;
use clap::ValueEnum;
use lifecycle_policy::{AssetContext, PolicyExecutionLog, StorageLifecyclePolicy};
use schemars::schema_for;

/// Documents with a published schema.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Target {
    /// A lifecycle policy.
    Policy,
    /// An inventory asset record.
    Asset,
    /// A policy execution log.
    Log,
}

/// Runs the schema command.
pub fn run(target: Target) -> Result<()> {
    let schema = match target {
        Target::Policy => schema_for!(StorageLifecyclePolicy),
        Target::Asset => schema_for!(AssetContext),
        Target::Log => schema_for!(PolicyExecutionLog),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
