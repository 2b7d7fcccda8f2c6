//! Step-by-step account of how an asset was resolved.
//!
//! Used by the CLI to show why a policy did or did not apply.

use crate::condition::evaluate_condition;
use crate::policy::{in_scope, order_by_priority};
use lifecycle_policy::{AssetContext, StorageLifecyclePolicy};
use serde::Serialize;

/// What happened when a policy was consulted for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum TraceOutcome {
    /// Policy is inactive.
    Inactive,
    /// Asset type is outside the policy scope.
    OutOfScope,
    /// A condition did not hold.
    ConditionFailed {
        /// The first failing condition, rendered.
        condition: String,
    },
    /// This policy won.
    Matched,
    /// Not consulted because an earlier policy already matched.
    Preempted,
}

/// One line of a resolution trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTrace {
    /// Policy id.
    pub policy_id: String,
    /// Policy name.
    pub policy_name: String,
    /// Policy priority.
    pub priority: i64,
    /// Outcome for this asset.
    #[serde(flatten)]
    pub outcome: TraceOutcome,
}

/// Explains the resolution of one asset, in evaluation order.
///
/// The trace agrees with [`crate::resolve_policy`]: at most one entry is
/// `Matched`, and every entry after it is `Preempted`.
pub fn explain_asset(asset: &AssetContext, policies: &[StorageLifecyclePolicy]) -> Vec<PolicyTrace> {
    let mut matched = false;
    order_by_priority(policies)
        .into_iter()
        .map(|policy| {
            let outcome = if matched {
                TraceOutcome::Preempted
            } else {
                let outcome = consult(policy, asset);
                matched = outcome == TraceOutcome::Matched;
                outcome
            };
            PolicyTrace {
                policy_id: policy.id.clone(),
                policy_name: policy.name.clone(),
                priority: policy.priority,
                outcome,
            }
        })
        .collect()
}

fn consult(policy: &StorageLifecyclePolicy, asset: &AssetContext) -> TraceOutcome {
    if !policy.is_active {
        return TraceOutcome::Inactive;
    }
    if !in_scope(policy, asset) {
        return TraceOutcome::OutOfScope;
    }
    policy
        .conditions
        .iter()
        .find(|condition| !evaluate_condition(condition, asset))
        .map_or(TraceOutcome::Matched, |failed| TraceOutcome::ConditionFailed {
            condition: failed.to_string(),
        })
}
