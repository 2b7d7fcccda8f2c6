//! Cost command implementation.

use anyhow::{Context, Result};
use lifecycle_policy::StorageTier;
use syncops_evaluator::{
    calculate_storage_cost_savings, format_storage_currency, format_storage_file_size,
    monthly_storage_cost,
};
use syncops_runner::Inventory;

/// Runs the cost command.
pub fn run(inventory_path: &str, target: Option<StorageTier>) -> Result<()> {
    let inventory = Inventory::load(inventory_path)
        .with_context(|| format!("Failed to load inventory: {inventory_path}"))?;

    let by_tier = inventory.bytes_by_tier();
    let mut total_cost = 0.0;
    let mut total_savings = 0.0;

    println!("{:<14} {:>12} {:>14}", "TIER", "SIZE", "MONTHLY");
    for (tier, bytes) in &by_tier {
        let cost = monthly_storage_cost(*tier, *bytes);
        total_cost += cost;
        if let Some(to) = target {
            total_savings += calculate_storage_cost_savings(*tier, to, *bytes);
        }
        println!(
            "{:<14} {:>12} {:>14}",
            tier.as_str(),
            format_storage_file_size(*bytes),
            format_storage_currency(cost)
        );
    }
    let total_bytes: u64 = by_tier.values().sum();
    println!(
        "{:<14} {:>12} {:>14}",
        "TOTAL",
        format_storage_file_size(total_bytes),
        format_storage_currency(total_cost)
    );

    if let Some(to) = target {
        println!(
            "Moving everything to {to} would save {} per month",
            format_storage_currency(total_savings)
        );
    }
    Ok(())
}
