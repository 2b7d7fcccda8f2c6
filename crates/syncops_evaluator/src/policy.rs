//! Policy matching and first-match resolution.

use crate::condition::evaluate_condition;
use lifecycle_policy::{AssetContext, PolicyActionConfig, StorageLifecyclePolicy};

/// Returns true if the policy applies to the asset.
///
/// A policy applies when it is active, the asset passes its scope filter,
/// and every condition holds. A policy without conditions matches every
/// in-scope asset.
pub fn evaluate_policy(policy: &StorageLifecyclePolicy, asset: &AssetContext) -> bool {
    policy.is_active
        && in_scope(policy, asset)
        && policy
            .conditions
            .iter()
            .all(|condition| evaluate_condition(condition, asset))
}

/// Returns true if the asset's type is allowed by the policy's scope.
///
/// An empty scope admits every asset; a non-empty scope rejects assets with
/// no type. Types compare case-insensitively.
pub fn in_scope(policy: &StorageLifecyclePolicy, asset: &AssetContext) -> bool {
    let allowed = policy.scoped_asset_types();
    if allowed.is_empty() {
        return true;
    }
    asset.asset_type.as_deref().is_some_and(|asset_type| {
        allowed
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(asset_type))
    })
}

/// Ordered rule-list resolution: the first rule that applies wins.
///
/// Rules are consulted strictly in iteration order and consultation stops
/// at the first hit, like an ACL or firewall rule list. Matching rules after
/// the winner are never consulted.
pub fn resolve_first_match<I, T, F>(rules: I, applies: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> bool,
{
    rules.into_iter().find(applies)
}

/// Orders policies by ascending priority number.
///
/// The sort is stable: policies sharing a priority keep their list order.
pub fn order_by_priority(policies: &[StorageLifecyclePolicy]) -> Vec<&StorageLifecyclePolicy> {
    let mut ordered: Vec<&StorageLifecyclePolicy> = policies.iter().collect();
    ordered.sort_by_key(|policy| policy.priority);
    ordered
}

/// Returns the policy that governs the asset, if any.
pub fn resolve_policy<'a>(
    asset: &AssetContext,
    policies: &'a [StorageLifecyclePolicy],
) -> Option<&'a StorageLifecyclePolicy> {
    resolve_first_match(order_by_priority(policies), |policy| {
        evaluate_policy(policy, asset)
    })
}

/// Returns the actions of the first matching policy, or `None`.
pub fn evaluate_asset_against_policy_set<'a>(
    asset: &AssetContext,
    policies: &'a [StorageLifecyclePolicy],
) -> Option<&'a [PolicyActionConfig]> {
    resolve_policy(asset, policies).map(|policy| policy.actions.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle_policy::{
        ActionType, ConditionField, Operator, PolicyCondition, PolicyType, StorageTier,
    };
    use proptest::prelude::*;

    fn legal_hold(priority: i64) -> StorageLifecyclePolicy {
        StorageLifecyclePolicy::new("legal-hold", PolicyType::LegalHold)
            .with_id("legal")
            .with_priority(priority)
            .with_condition(PolicyCondition::new(
                ConditionField::IsLegalHold,
                Operator::Equals,
                true,
            ))
            .with_action(PolicyActionConfig::simple(ActionType::Lock))
            .activate()
    }

    fn archive(priority: i64) -> StorageLifecyclePolicy {
        StorageLifecyclePolicy::new("archive", PolicyType::AccessBased)
            .with_id("archive")
            .with_priority(priority)
            .with_condition(PolicyCondition::new(
                ConditionField::DaysSinceLastAccess,
                Operator::GreaterThan,
                90_i64,
            ))
            .with_action(PolicyActionConfig::transition(StorageTier::Cold))
            .activate()
    }

    fn held_idle_asset() -> AssetContext {
        AssetContext::new("clip")
            .with(ConditionField::IsLegalHold, true)
            .with(ConditionField::DaysSinceLastAccess, 120_i64)
    }

    #[test]
    fn legal_hold_preempts_archival() {
        let policies = vec![legal_hold(1), archive(100)];
        let actions = evaluate_asset_against_policy_set(&held_idle_asset(), &policies).unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action_type, ActionType::Lock);
    }

    #[test]
    fn priority_beats_list_order() {
        let policies = vec![archive(2), legal_hold(1)];
        let winner = resolve_policy(&held_idle_asset(), &policies).unwrap();
        assert_eq!(winner.id, "legal");
    }

    #[test]
    fn ties_keep_list_order() {
        let asset = held_idle_asset();
        let archive_first = [archive(5), legal_hold(5)];
        let first = resolve_policy(&asset, &archive_first).unwrap();
        assert_eq!(first.id, "archive");
        let hold_first = [legal_hold(5), archive(5)];
        let first = resolve_policy(&asset, &hold_first).unwrap();
        assert_eq!(first.id, "legal");
    }

    #[test]
    fn falls_through_to_later_policy() {
        let asset = AssetContext::new("clip")
            .with(ConditionField::IsLegalHold, false)
            .with(ConditionField::DaysSinceLastAccess, 120_i64);
        let policies = [legal_hold(1), archive(100)];
        let actions = evaluate_asset_against_policy_set(&asset, &policies).unwrap();
        assert_eq!(actions[0].target_tier, Some(StorageTier::Cold));
    }

    #[test]
    fn no_match_returns_none() {
        let asset = AssetContext::new("fresh").with(ConditionField::DaysSinceLastAccess, 3_i64);
        assert!(evaluate_asset_against_policy_set(&asset, &[legal_hold(1), archive(100)]).is_none());
        assert!(evaluate_asset_against_policy_set(&asset, &[]).is_none());
    }

    #[test]
    fn missing_field_blocks_only_policies_that_need_it() {
        let asset = AssetContext::new("partial").with(ConditionField::DaysSinceLastAccess, 200_i64);
        let policies = [legal_hold(1), archive(100)];
        let winner = resolve_policy(&asset, &policies).unwrap();
        assert_eq!(winner.id, "archive");
    }

    #[test]
    fn empty_conditions_match_everything_in_scope() {
        let catch_all = StorageLifecyclePolicy::new("lock-all", PolicyType::Custom)
            .unconditional()
            .with_action(PolicyActionConfig::simple(ActionType::Lock))
            .activate();
        assert!(evaluate_policy(&catch_all, &AssetContext::new("anything")));
    }

    #[test]
    fn scope_filters_asset_types() {
        let scoped = archive(1).with_scope(["video"]);
        let video = held_idle_asset().with_type("Video");
        let image = held_idle_asset().with_type("image");
        let untyped = held_idle_asset();

        assert!(evaluate_policy(&scoped, &video));
        assert!(!evaluate_policy(&scoped, &image));
        assert!(!evaluate_policy(&scoped, &untyped));
    }

    #[test]
    fn resolve_first_match_stops_at_first_hit() {
        let mut consulted = Vec::new();
        let hit = resolve_first_match([1, 2, 3, 4], |n| {
            consulted.push(*n);
            n % 2 == 0
        });
        assert_eq!(hit, Some(2));
        assert_eq!(consulted, vec![1, 2]);
    }

    proptest! {
        #[test]
        fn inactive_policies_never_match(days in 0i64..1000, hold in any::<bool>()) {
            let asset = AssetContext::new("p")
                .with(ConditionField::DaysSinceLastAccess, days)
                .with(ConditionField::IsLegalHold, hold);
            let mut policy = archive(1);
            policy.is_active = false;
            prop_assert!(!evaluate_policy(&policy, &asset));

            let mut catch_all = StorageLifecyclePolicy::new("all", PolicyType::Custom).unconditional();
            catch_all.is_active = false;
            prop_assert!(!evaluate_policy(&catch_all, &asset));
        }

        #[test]
        fn resolution_is_independent_of_list_order(p1 in 0i64..50, gap in 1i64..50, swap in any::<bool>()) {
            let high = legal_hold(p1);
            let low = archive(p1 + gap);
            let policies = if swap { vec![low, high] } else { vec![high, low] };
            let winner = resolve_policy(&held_idle_asset(), &policies).unwrap();
            prop_assert_eq!(winner.id.as_str(), "legal");
        }
    }
}
