//! Human-readable policy set report.
//!
//! Explains, in Markdown, which policy wins for an asset and what each one
//! does, so the set can be reviewed before it is activated.

use crate::set::lint_policy_set;
use lifecycle_policy::{ActionType, StorageLifecyclePolicy, StorageTier};
use std::fmt::Write;
use syncops_evaluator::{calculate_storage_cost_savings, format_storage_currency, order_by_priority};

const ONE_TB: u64 = 1_000_000_000_000;

/// Generates a Markdown explanation of a policy set.
///
/// The report includes:
/// - Set overview
/// - Policy-by-policy explanation in evaluation order
/// - Lint findings
#[must_use]
pub fn explain_policy_set(policies: &[StorageLifecyclePolicy]) -> String {
    let mut report = String::new();
    let active = policies.iter().filter(|p| p.is_active).count();

    report.push_str("# Lifecycle Policy Report\n\n");

    report.push_str("## Overview\n\n");
    let _ = writeln!(report, "- **Policies**: {}", policies.len());
    let _ = writeln!(report, "- **Active**: {active}");
    let _ = writeln!(report, "- **Inactive**: {}", policies.len() - active);
    report.push('\n');

    report.push_str("## Evaluation Order\n\n");
    report.push_str(
        "Policies are evaluated lowest priority number first. The first active policy \
         whose scope and conditions match an asset decides its actions.\n\n",
    );

    for (i, policy) in order_by_priority(policies).into_iter().enumerate() {
        write_policy(&mut report, i + 1, policy);
    }

    report.push_str("## Findings\n\n");
    let lint = lint_policy_set(policies);
    if lint.is_clean() {
        report.push_str("No ordering problems found.\n");
    }
    for violation in &lint.violations {
        let _ = writeln!(
            report,
            "- **{}** `{}`: {}",
            violation.severity, violation.check, violation.message
        );
    }
    for warning in &lint.warnings {
        let _ = writeln!(
            report,
            "- **{}** `{}`: {}",
            warning.severity, warning.check, warning.message
        );
    }

    report
}

fn write_policy(report: &mut String, position: usize, policy: &StorageLifecyclePolicy) {
    let state = if policy.is_active { "active" } else { "inactive" };
    let _ = writeln!(
        report,
        "### {position}. {} (priority: {}, {state})\n",
        policy.name, policy.priority
    );

    if let Some(description) = &policy.description {
        let _ = writeln!(report, "{description}\n");
    }

    let _ = writeln!(report, "- **Type**: {}", policy.policy_type);
    let scope = policy.scoped_asset_types();
    if scope.is_empty() {
        report.push_str("- **Scope**: all assets\n");
    } else {
        let _ = writeln!(report, "- **Scope**: {}", scope.join(", "));
    }

    if policy.conditions.is_empty() {
        report.push_str("- **When**: always\n");
    } else {
        let conditions: Vec<String> = policy
            .conditions
            .iter()
            .map(|c| format!("`{c}`"))
            .collect();
        let _ = writeln!(report, "- **When**: {}", conditions.join(" and "));
    }

    for action in &policy.actions {
        let _ = write!(report, "- **Then**: {action}");
        if matches!(action.action_type, ActionType::Transition | ActionType::Archive) {
            if let Some(to) = action.destination_tier() {
                if to.coldness() > StorageTier::Hot.coldness() {
                    let saving = calculate_storage_cost_savings(StorageTier::Hot, to, ONE_TB);
                    let _ = write!(
                        report,
                        " (saves {} per TB-month from HOT)",
                        format_storage_currency(saving)
                    );
                } else {
                    report.push_str(" (brings data back to a warmer tier)");
                }
            }
        }
        report.push('\n');
    }

    let _ = writeln!(
        report,
        "- **Schedule**: {}\n",
        policy.schedule.run_frequency
    );
}
