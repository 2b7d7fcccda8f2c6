//! Run command implementation.

use super::PolicySource;
use anyhow::{Context, Result};
use chrono::Utc;
use lifecycle_policy::{ExecutionStatus, PolicyExecutionLog};
use syncops_runner::{Inventory, Runner, RunnerConfig, SimulatedBackend};
use syncops_validator::lint_policy_set;
use tracing::{error, info, warn};

/// Options for the run command.
pub struct RunOptions {
    /// Policy id or name to run now; `None` runs the schedule.
    pub target: Option<String>,
    /// Skip applying actions.
    pub dry_run: bool,
    /// Asset ids the simulated backend treats as busy.
    pub busy: Vec<String>,
    /// Parallel evaluation tasks.
    pub concurrency: Option<usize>,
    /// Persist advanced schedules.
    pub save_schedules: bool,
}

/// Runs the run command.
pub async fn run(policies_path: &str, inventory_path: &str, options: RunOptions) -> Result<()> {
    let source = PolicySource::open(policies_path)?;
    let mut policies = source.load()?;
    let inventory = Inventory::load(inventory_path)
        .with_context(|| format!("Failed to load inventory: {inventory_path}"))?;

    let mut config = RunnerConfig::default().with_dry_run(options.dry_run);
    if let Some(n) = options.concurrency {
        config = config.with_concurrency(n);
    }
    let runner = Runner::new(config);
    let mut backend = SimulatedBackend::new().with_busy(options.busy);

    let logs = if let Some(target) = options.target.as_deref() {
        let policy = policies
            .iter()
            .find(|p| p.id == target || p.name == target)
            .with_context(|| format!("Policy not found: {target}"))?;
        info!("Running now: {}", policy.name);
        vec![runner.run_policy(policy, inventory.assets(), &mut backend)]
    } else {
        let lint = lint_policy_set(&policies);
        if !lint.is_schedulable() {
            for violation in &lint.violations {
                error!("[{}] {}", violation.check, violation.message);
            }
            anyhow::bail!("Refusing to run a policy set with critical findings");
        }

        let logs = runner
            .run_scheduled(&mut policies, inventory.assets(), &mut backend, Utc::now())
            .await?;
        if logs.is_empty() {
            info!("No policies are due");
        }
        if options.save_schedules && !options.dry_run && !logs.is_empty() {
            source.record_runs(&policies, &logs)?;
            info!("Saved advanced schedules to: {}", policies_path);
        }
        logs
    };

    report(&logs);
    println!("{}", serde_json::to_string_pretty(&logs)?);

    if !logs.iter().all(PolicyExecutionLog::is_usable) {
        anyhow::bail!("One or more policy runs failed");
    }
    Ok(())
}

fn report(logs: &[PolicyExecutionLog]) {
    for log in logs {
        match log.status {
            ExecutionStatus::Success => info!(
                "{}: {} of {} assets actioned",
                log.policy_name, log.assets_transitioned, log.assets_evaluated
            ),
            ExecutionStatus::Partial | ExecutionStatus::Failed => warn!(
                "{}: {} ({} errors)",
                log.policy_name,
                log.status,
                log.errors.len()
            ),
        }
    }
}
