//! Init command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use lifecycle_policy::{templates, to_yaml};
use std::fs;
use std::path::Path;
use syncops_runner::{FixtureConfig, FixtureGenerator, InMemoryPolicyStore, PolicyStore};
use tracing::info;

/// Runs the init command.
pub fn run(path: &str, organization: &str, asset_count: usize, seed: u64) -> Result<()> {
    let project_path = Path::new(path);
    info!("Initializing SyncOps workspace at: {}", project_path.display());

    fs::create_dir_all(project_path)
        .with_context(|| format!("Failed to create directory: {}", project_path.display()))?;

    // Every template, instantiated for the organization
    let policy_path = project_path.join("policies.yaml");
    if policy_path.exists() {
        info!("Skipped: {} (already exists)", policy_path.display());
    } else {
        let now = Utc::now();
        let store = InMemoryPolicyStore::new();
        for template in templates() {
            store
                .install_template(template.id, organization, now)
                .with_context(|| format!("Template {} failed validation", template.id))?;
        }
        let mut policies = store.list()?;
        policies.sort_by_key(|p| p.priority);
        fs::write(&policy_path, to_yaml(&policies)?)
            .with_context(|| "Failed to create policies.yaml")?;
        info!("Created: {} ({} policies)", policy_path.display(), policies.len());
    }

    // Sample inventory
    let inventory_path = project_path.join("inventory.json");
    if inventory_path.exists() {
        info!("Skipped: {} (already exists)", inventory_path.display());
    } else {
        let config = FixtureConfig::default()
            .with_seed(seed)
            .with_count(asset_count);
        let inventory = FixtureGenerator::new(config).media_library();
        inventory
            .save_json(&inventory_path)
            .with_context(|| "Failed to create inventory.json")?;
        info!("Created: {} ({} assets)", inventory_path.display(), inventory.len());
    }

    info!("SyncOps workspace initialized!");
    info!("Next steps:");
    info!("  1. Review policies.yaml and adjust priorities");
    info!("  2. Run 'syncops validate' to check the set");
    info!("  3. Run 'syncops run --dry-run' to preview a scheduled run");

    Ok(())
}
