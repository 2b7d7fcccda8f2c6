//! Explain command implementation.

use super::load_policies;
use anyhow::{Context, Result};
use std::fs;
use syncops_validator::explain_policy_set;
use tracing::info;

/// Runs the explain command.
pub fn run(policies_path: &str, output_path: Option<&str>) -> Result<()> {
    info!("Generating policy report for: {}", policies_path);
    let policies = load_policies(policies_path)?;
    let report = explain_policy_set(&policies);

    match output_path {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("Failed to write output file: {path}"))?;
            info!("Policy report written to: {}", path);
        }
        None => print!("{report}"),
    }
    Ok(())
}
