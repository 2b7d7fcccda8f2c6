//! Canned policy definitions.
//!
//! Templates are the usual starting point for a new policy: pick one,
//! instantiate it for an organization, then adjust thresholds.

use crate::error::{Error, Result};
use crate::id::derive_id;
use crate::model::{
    ActionType, ConditionField, Operator, PolicyActionConfig, PolicyCondition, PolicyType,
    StorageLifecyclePolicy,
};
use crate::schedule::{PolicySchedule, RunFrequency};
use crate::tier::StorageTier;
use chrono::{DateTime, Utc};
use tracing::debug;

/// A named, reusable policy definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTemplate {
    /// Stable template identifier.
    pub id: &'static str,
    /// Short summary shown in template pickers.
    pub summary: &'static str,
    /// Policy produced by instantiation (id and organization unset).
    pub policy: StorageLifecyclePolicy,
}

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Returns the template library.
#[must_use]
pub fn templates() -> Vec<PolicyTemplate> {
    vec![
        PolicyTemplate {
            id: "legal-hold-lock",
            summary: "Lock every asset under legal hold",
            policy: StorageLifecyclePolicy::new("Legal hold lock", PolicyType::LegalHold)
                .with_description("Assets under legal hold are locked and never transitioned or deleted")
                .with_priority(1)
                .with_condition(PolicyCondition::new(
                    ConditionField::IsLegalHold,
                    Operator::Equals,
                    true,
                ))
                .with_action(PolicyActionConfig::simple(ActionType::Lock))
                .with_schedule(PolicySchedule::new(RunFrequency::Hourly)),
        },
        PolicyTemplate {
            id: "archive-idle-media",
            summary: "Move media untouched for 90 days to cold storage",
            policy: StorageLifecyclePolicy::new("Archive idle media", PolicyType::AccessBased)
                .with_description("Transition assets not accessed in 90 days to the cold tier")
                .with_priority(100)
                .with_condition(PolicyCondition::new(
                    ConditionField::DaysSinceLastAccess,
                    Operator::GreaterThan,
                    90_i64,
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::CurrentStorageTier,
                    Operator::In,
                    vec!["HOT", "WARM"],
                ))
                .with_action(PolicyActionConfig::transition(StorageTier::Cold))
                .with_schedule(PolicySchedule::new(RunFrequency::Daily)),
        },
        PolicyTemplate {
            id: "deep-archive-closed-projects",
            summary: "Deep-archive assets of projects closed for a year",
            policy: StorageLifecyclePolicy::new(
                "Deep archive closed projects",
                PolicyType::ProjectStatus,
            )
            .with_description("Projects completed more than 365 days ago go to deep archive")
            .with_priority(200)
            .with_condition(PolicyCondition::new(
                ConditionField::ProjectStatus,
                Operator::In,
                vec!["COMPLETED", "ARCHIVED"],
            ))
            .with_condition(PolicyCondition::new(
                ConditionField::DaysSinceProjectClose,
                Operator::GreaterThanOrEqual,
                365_i64,
            ))
            .with_condition(PolicyCondition::new(
                ConditionField::HasActiveRights,
                Operator::Equals,
                false,
            ))
            .with_action(PolicyActionConfig::transition(StorageTier::DeepArchive))
            .with_schedule(PolicySchedule::new(RunFrequency::Weekly)),
        },
        PolicyTemplate {
            id: "cost-optimize-large-files",
            summary: "Move large, rarely downloaded files to the warm tier",
            policy: StorageLifecyclePolicy::new("Optimize large files", PolicyType::CostOptimization)
                .with_description("Files over 10 GiB with fewer than 5 downloads in 30 days move to warm storage")
                .with_priority(150)
                .with_condition(PolicyCondition::new(
                    ConditionField::FileSize,
                    Operator::GreaterThan,
                    10.0 * GIB,
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::DaysSinceLastAccess,
                    Operator::GreaterThan,
                    30_i64,
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::DownloadCount,
                    Operator::LessThan,
                    5_i64,
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::CurrentStorageTier,
                    Operator::Equals,
                    "HOT",
                ))
                .with_action(PolicyActionConfig::transition(StorageTier::Warm))
                .with_scope(["video", "raw"])
                .with_schedule(PolicySchedule::new(RunFrequency::Weekly)),
        },
        PolicyTemplate {
            id: "notify-stale-unapproved",
            summary: "Notify producers about unapproved media older than 60 days",
            policy: StorageLifecyclePolicy::new("Stale review reminder", PolicyType::AccessBased)
                .with_description("Unapproved cuts idle for 60 days are flagged to producers")
                .with_priority(300)
                .with_condition(PolicyCondition::new(
                    ConditionField::ApprovalStatus,
                    Operator::NotIn,
                    "APPROVED,REJECTED",
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::DaysSinceUpload,
                    Operator::GreaterThan,
                    60_i64,
                ))
                .with_action(PolicyActionConfig::notify(["PRODUCER", "ADMIN"]))
                .with_schedule(PolicySchedule::new(RunFrequency::Weekly)),
        },
        PolicyTemplate {
            id: "restore-active-projects",
            summary: "Restore archived assets of active projects that are being used again",
            policy: StorageLifecyclePolicy::new("Restore active assets", PolicyType::AccessBased)
                .with_description("Archived assets accessed again by an active project return to hot storage")
                .with_priority(50)
                .with_condition(PolicyCondition::new(
                    ConditionField::ProjectStatus,
                    Operator::Equals,
                    "ACTIVE",
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::DaysSinceLastAccess,
                    Operator::LessThanOrEqual,
                    7_i64,
                ))
                .with_condition(PolicyCondition::new(
                    ConditionField::CurrentStorageTier,
                    Operator::In,
                    vec!["COLD", "GLACIER", "DEEP_ARCHIVE"],
                ))
                .with_action(PolicyActionConfig::simple(ActionType::Restore))
                .with_schedule(PolicySchedule::new(RunFrequency::Daily)),
        },
    ]
}

/// Instantiates a template for an organization.
///
/// The new policy is active, at version 1, with a fresh id and timestamps.
///
/// # Errors
///
/// Returns [`Error::UnknownTemplate`] if no template has the given id.
pub fn instantiate(
    template_id: &str,
    organization_id: &str,
    now: DateTime<Utc>,
) -> Result<StorageLifecyclePolicy> {
    let template = templates()
        .into_iter()
        .find(|t| t.id == template_id)
        .ok_or_else(|| Error::UnknownTemplate(template_id.to_string()))?;

    let mut policy = template.policy;
    policy.id = derive_id("pol", &[organization_id, template_id], now);
    policy.organization_id = organization_id.to_string();
    policy.is_active = true;
    policy.version = 1;
    policy.created_at = Some(now);
    policy.updated_at = Some(now);

    debug!(template = template_id, policy_id = %policy.id, "Instantiated policy template");
    Ok(policy)
}
