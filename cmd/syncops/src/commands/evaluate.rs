//! Evaluate command implementation.

use super::load_policies;
use anyhow::{Context, Result};
use syncops_evaluator::{explain_asset, format_storage_currency, TraceOutcome};
use syncops_runner::{summarize, Inventory, Runner, RunnerConfig};
use tracing::info;

/// Runs the evaluate command.
pub async fn run(
    policies_path: &str,
    inventory_path: &str,
    json: bool,
    asset_id: Option<&str>,
    concurrency: Option<usize>,
) -> Result<()> {
    let policies = load_policies(policies_path)?;
    let inventory = Inventory::load(inventory_path)
        .with_context(|| format!("Failed to load inventory: {inventory_path}"))?;
    info!("Evaluating {} assets", inventory.len());

    if let Some(id) = asset_id {
        let asset = inventory
            .assets()
            .iter()
            .find(|a| a.id == id)
            .with_context(|| format!("Asset not found in inventory: {id}"))?;
        for step in explain_asset(asset, &policies) {
            let detail = match &step.outcome {
                TraceOutcome::Inactive => "inactive".to_string(),
                TraceOutcome::OutOfScope => "out of scope".to_string(),
                TraceOutcome::ConditionFailed { condition } => format!("failed `{condition}`"),
                TraceOutcome::Matched => "MATCHED".to_string(),
                TraceOutcome::Preempted => "preempted".to_string(),
            };
            println!("{:>6}  {:<32} {detail}", step.priority, step.policy_name);
        }
        return Ok(());
    }

    let mut config = RunnerConfig::default();
    if let Some(n) = concurrency {
        config = config.with_concurrency(n);
    }
    let decisions = Runner::new(config)
        .evaluate(inventory.assets(), &policies)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
        return Ok(());
    }

    let summary = summarize(&decisions);
    for (policy, count) in &summary.by_policy {
        println!("{count:>8}  {policy}");
    }
    println!("{:>8}  (no policy)", summary.assets - summary.matched);
    println!(
        "Estimated monthly savings: {}",
        format_storage_currency(summary.estimated_savings)
    );
    Ok(())
}
