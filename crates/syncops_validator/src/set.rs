//! Checks that span a whole policy set.
//!
//! Only active policies take part: an inactive policy never matches, so it
//! cannot shadow or be shadowed.

use crate::result::{PolicySetReport, Violation, Warning};
use lifecycle_policy::StorageLifecyclePolicy;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Lints a policy set for ordering problems.
///
/// Reports a critical `legal-hold-precedence` violation when any active
/// non-legal-hold policy has a priority at or before an active legal-hold
/// lock, plus `duplicate-priority` and `unreachable-policy` warnings.
pub fn lint_policy_set(policies: &[StorageLifecyclePolicy]) -> PolicySetReport {
    let active: Vec<&StorageLifecyclePolicy> = policies.iter().filter(|p| p.is_active).collect();

    let mut report = PolicySetReport::default();
    report.violations.extend(check_legal_hold_precedence(&active));
    report.warnings.extend(check_duplicate_priorities(&active));
    report.warnings.extend(check_unreachable(&active));

    if !report.is_schedulable() {
        warn!(
            violations = report.violations.len(),
            "policy set is not schedulable"
        );
    }
    debug!(
        active = active.len(),
        warnings = report.warnings.len(),
        "linted policy set"
    );
    report
}

fn check_legal_hold_precedence(active: &[&StorageLifecyclePolicy]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for hold in active.iter().filter(|p| p.is_legal_hold_lock()) {
        for other in active.iter().filter(|p| !p.is_legal_hold_lock()) {
            if other.priority <= hold.priority {
                violations.push(Violation::critical(
                    "legal-hold-precedence",
                    format!(
                        "Legal hold policy '{}' (priority {}) must run before '{}' (priority {})",
                        hold.name, hold.priority, other.name, other.priority
                    ),
                ));
            }
        }
    }
    violations
}

fn check_duplicate_priorities(active: &[&StorageLifecyclePolicy]) -> Vec<Warning> {
    let mut by_priority: BTreeMap<i64, Vec<&str>> = BTreeMap::new();
    for policy in active {
        by_priority
            .entry(policy.priority)
            .or_default()
            .push(policy.name.as_str());
    }

    by_priority
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(priority, names)| {
            Warning::new(
                "duplicate-priority",
                format!(
                    "Policies {} share priority {priority}; list order decides between them",
                    quoted(&names)
                ),
            )
        })
        .collect()
}

fn check_unreachable(active: &[&StorageLifecyclePolicy]) -> Vec<Warning> {
    let mut ordered = active.to_vec();
    ordered.sort_by_key(|p| p.priority);

    let Some(position) = ordered.iter().position(|p| p.is_catch_all()) else {
        return Vec::new();
    };
    let shadow = ordered[position];
    ordered[position + 1..]
        .iter()
        .map(|hidden| {
            Warning::new(
                "unreachable-policy",
                format!(
                    "Policy '{}' can never match: catch-all '{}' (priority {}) matches first",
                    hidden.name, shadow.name, shadow.priority
                ),
            )
        })
        .collect()
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle_policy::{
        ActionType, ConditionField, Operator, PolicyActionConfig, PolicyCondition, PolicyType,
        StorageTier,
    };

    fn legal_hold(priority: i64) -> StorageLifecyclePolicy {
        StorageLifecyclePolicy::new("Legal hold", PolicyType::LegalHold)
            .with_priority(priority)
            .with_condition(PolicyCondition::new(
                ConditionField::IsLegalHold,
                Operator::Equals,
                true,
            ))
            .with_action(PolicyActionConfig::simple(ActionType::Lock))
            .activate()
    }

    fn archive(name: &str, priority: i64) -> StorageLifecyclePolicy {
        StorageLifecyclePolicy::new(name, PolicyType::AccessBased)
            .with_priority(priority)
            .with_condition(PolicyCondition::new(
                ConditionField::DaysSinceLastAccess,
                Operator::GreaterThan,
                90_i64,
            ))
            .with_action(PolicyActionConfig::transition(StorageTier::Cold))
            .activate()
    }

    #[test]
    fn well_ordered_set_is_clean() {
        let report = lint_policy_set(&[archive("Archive", 100), legal_hold(1)]);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn archive_before_legal_hold_is_critical() {
        let report = lint_policy_set(&[legal_hold(50), archive("Archive", 10)]);
        assert!(!report.is_schedulable());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].check, "legal-hold-precedence");
        assert!(report.violations[0].message.contains("'Archive'"));
    }

    #[test]
    fn tie_with_legal_hold_is_critical() {
        let report = lint_policy_set(&[legal_hold(5), archive("Archive", 5)]);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].check, "duplicate-priority");
    }

    #[test]
    fn inactive_policies_are_ignored() {
        let mut early = archive("Early", 0);
        early.is_active = false;
        let report = lint_policy_set(&[legal_hold(1), early]);
        assert!(report.is_clean());
    }

    #[test]
    fn duplicate_priorities_are_warnings() {
        let report = lint_policy_set(&[archive("A", 10), archive("B", 10), archive("C", 20)]);
        assert!(report.is_schedulable());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("'A', 'B'"));
    }

    #[test]
    fn policies_behind_catch_all_are_unreachable() {
        let catch_all = StorageLifecyclePolicy::new("Everything cold", PolicyType::Custom)
            .with_priority(50)
            .unconditional()
            .with_action(PolicyActionConfig::transition(StorageTier::Cold))
            .activate();
        let report = lint_policy_set(&[archive("Later", 100), catch_all, archive("Sooner", 10)]);
        let unreachable: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.check == "unreachable-policy")
            .collect();
        assert_eq!(unreachable.len(), 1);
        assert!(unreachable[0].message.starts_with("Policy 'Later'"));
    }

    #[test]
    fn scoped_catch_all_shadows_nothing() {
        let scoped = StorageLifecyclePolicy::new("Video cold", PolicyType::Custom)
            .with_priority(50)
            .unconditional()
            .with_scope(["video"])
            .with_action(PolicyActionConfig::transition(StorageTier::Cold))
            .activate();
        let report = lint_policy_set(&[scoped, archive("Later", 100)]);
        assert!(report.is_clean());
    }
}
