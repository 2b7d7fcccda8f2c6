//! Storage cost model.
//!
//! Costs come from the static per-tier $/GB-month table on
//! [`StorageTier::cost_per_gb`]. Sizes are converted with decimal GB
//! (1 GB = 1e9 bytes) to match how storage is billed.

use lifecycle_policy::{AssetContext, PolicyActionConfig, StorageTier};

const BYTES_PER_GB: f64 = 1e9;

#[allow(clippy::cast_precision_loss)]
fn gigabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Monthly USD cost of keeping `bytes` in `tier`.
pub fn monthly_storage_cost(tier: StorageTier, bytes: u64) -> f64 {
    tier.cost_per_gb() * gigabytes(bytes)
}

/// Monthly USD saved by moving `bytes` from one tier to another.
///
/// Negative when the destination is more expensive; callers check the sign
/// before presenting the figure as a saving.
pub fn calculate_storage_cost_savings(from: StorageTier, to: StorageTier, bytes: u64) -> f64 {
    (from.cost_per_gb() - to.cost_per_gb()) * gigabytes(bytes)
}

/// Monthly savings an action would achieve for an asset.
///
/// `None` when the action does not move data or the asset's tier or size is
/// unknown.
pub fn transition_savings(asset: &AssetContext, action: &PolicyActionConfig) -> Option<f64> {
    let to = action.destination_tier()?;
    let from = asset.current_tier()?;
    let bytes = asset.file_size()?;
    Some(calculate_storage_cost_savings(from, to, bytes))
}
