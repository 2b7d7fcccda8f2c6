//! Validate command implementation.

use super::load_policies;
use anyhow::Result;
use syncops_validator::{lint_policy_set, validate_storage_policy};
use tracing::{error, info, warn};

/// Runs the validate command.
pub fn run(policies_path: &str, strict: bool) -> Result<()> {
    info!("Validating policies: {}", policies_path);
    let policies = load_policies(policies_path)?;

    let mut invalid = 0;
    for policy in &policies {
        let report = validate_storage_policy(policy);
        if report.valid {
            info!("OK: {}", policy.name);
            continue;
        }
        invalid += 1;
        for message in &report.errors {
            error!("{}: {}", policy.name, message);
        }
    }

    let lint = lint_policy_set(&policies);
    for violation in &lint.violations {
        error!(
            "[{}] {}: {}",
            violation.severity, violation.check, violation.message
        );
    }
    for warning in &lint.warnings {
        warn!(
            "[{}] {}: {}",
            warning.severity, warning.check, warning.message
        );
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} of {} policies are invalid", policies.len());
    }
    if !lint.is_schedulable() {
        anyhow::bail!(
            "Policy set failed with {} violation(s)",
            lint.violations.len()
        );
    }
    if strict && !lint.warnings.is_empty() {
        anyhow::bail!(
            "Policy set failed with {} warning(s) (strict mode)",
            lint.warnings.len()
        );
    }

    info!("All {} policies are valid", policies.len());
    Ok(())
}
