//! Typed policy model.
//!
//! Mirrors the `StorageLifecyclePolicy` record kept in the managed data
//! store. Enumerations carry an `Unknown` catch-all so that a record with an
//! unrecognised field, operator or action type still loads; the validator
//! reports those and the evaluator treats them as non-matching.

use crate::schedule::PolicySchedule;
use crate::tier::StorageTier;
use crate::value::Value;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a lifecycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    /// Driven by asset age.
    TimeBased,
    /// Driven by access history.
    AccessBased,
    /// Driven by the owning project's status.
    ProjectStatus,
    /// Driven by storage cost.
    CostOptimization,
    /// Legal hold enforcement.
    LegalHold,
    /// Anything else.
    Custom,
    /// Any policy type name this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TimeBased => "TIME_BASED",
            Self::AccessBased => "ACCESS_BASED",
            Self::ProjectStatus => "PROJECT_STATUS",
            Self::CostOptimization => "COST_OPTIMIZATION",
            Self::LegalHold => "LEGAL_HOLD",
            Self::Custom => "CUSTOM",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Asset attribute a condition inspects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ConditionField {
    /// Days since the asset was last read.
    DaysSinceLastAccess,
    /// Days since the asset was uploaded.
    DaysSinceUpload,
    /// Days since the owning project closed.
    DaysSinceProjectClose,
    /// Number of reads.
    AccessCount,
    /// Number of downloads.
    DownloadCount,
    /// Owning project status (e.g. `ACTIVE`, `COMPLETED`).
    ProjectStatus,
    /// Tier the asset currently lives in.
    CurrentStorageTier,
    /// Size in bytes.
    FileSize,
    /// MIME type of the stored object.
    MimeType,
    /// Whether usage rights are still active.
    HasActiveRights,
    /// Whether the asset is under legal hold.
    IsLegalHold,
    /// Review/approval state.
    ApprovalStatus,
    /// Any field name this build does not recognise.
    #[serde(other)]
    Unknown,
}

/// Semantic type a field's values are compared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Compared numerically.
    Number,
    /// Compared as booleans.
    Bool,
    /// Compared as exact strings.
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Bool => write!(f, "boolean"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl ConditionField {
    /// Every recognised field.
    pub const ALL: [Self; 12] = [
        Self::DaysSinceLastAccess,
        Self::DaysSinceUpload,
        Self::DaysSinceProjectClose,
        Self::AccessCount,
        Self::DownloadCount,
        Self::ProjectStatus,
        Self::CurrentStorageTier,
        Self::FileSize,
        Self::MimeType,
        Self::HasActiveRights,
        Self::IsLegalHold,
        Self::ApprovalStatus,
    ];

    /// Attribute key used in asset context records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DaysSinceLastAccess => "daysSinceLastAccess",
            Self::DaysSinceUpload => "daysSinceUpload",
            Self::DaysSinceProjectClose => "daysSinceProjectClose",
            Self::AccessCount => "accessCount",
            Self::DownloadCount => "downloadCount",
            Self::ProjectStatus => "projectStatus",
            Self::CurrentStorageTier => "currentStorageTier",
            Self::FileSize => "fileSize",
            Self::MimeType => "mimeType",
            Self::HasActiveRights => "hasActiveRights",
            Self::IsLegalHold => "isLegalHold",
            Self::ApprovalStatus => "approvalStatus",
            Self::Unknown => "unknown",
        }
    }

    /// Declared value kind, `None` for unknown fields.
    #[must_use]
    pub const fn kind(self) -> Option<ValueKind> {
        match self {
            Self::DaysSinceLastAccess
            | Self::DaysSinceUpload
            | Self::DaysSinceProjectClose
            | Self::AccessCount
            | Self::DownloadCount
            | Self::FileSize => Some(ValueKind::Number),
            Self::HasActiveRights | Self::IsLegalHold => Some(ValueKind::Bool),
            Self::ProjectStatus
            | Self::CurrentStorageTier
            | Self::MimeType
            | Self::ApprovalStatus => Some(ValueKind::Text),
            Self::Unknown => None,
        }
    }

    /// Looks up a field by its attribute key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }
}

impl fmt::Display for ConditionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Type-aware equality.
    Equals,
    /// Type-aware inequality.
    NotEquals,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `<`.
    LessThan,
    /// Numeric `>=`.
    GreaterThanOrEqual,
    /// Numeric `<=`.
    LessThanOrEqual,
    /// Substring or list element.
    Contains,
    /// Membership in a list or comma-separated string.
    In,
    /// Non-membership in a list or comma-separated string.
    NotIn,
    /// Any operator name this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl Operator {
    /// Returns true for the numeric ordering operators.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::LessThan | Self::GreaterThanOrEqual | Self::LessThanOrEqual
        )
    }

    /// Wire name of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::Contains => "contains",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field operator value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyCondition {
    /// Attribute inspected.
    pub field: ConditionField,
    /// Comparison applied.
    pub operator: Operator,
    /// Operand compared against the asset's value.
    pub value: Value,
}

impl PolicyCondition {
    /// Creates a new condition.
    #[must_use]
    pub fn new(field: ConditionField, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for PolicyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Kind of lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Move to `targetTier`.
    Transition,
    /// Delete the object.
    Delete,
    /// Move to the archive tier.
    Archive,
    /// Bring back to the hot tier.
    Restore,
    /// Notify `notifyRoles`.
    Notify,
    /// Prevent any further transition or deletion.
    Lock,
    /// Any action type this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transition => "TRANSITION",
            Self::Delete => "DELETE",
            Self::Archive => "ARCHIVE",
            Self::Restore => "RESTORE",
            Self::Notify => "NOTIFY",
            Self::Lock => "LOCK",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// One action a policy applies to matching assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyActionConfig {
    /// Kind of action.
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Destination tier, required for `TRANSITION`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tier: Option<StorageTier>,
    /// Roles notified by `NOTIFY`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notify_roles: Vec<String>,
}

impl PolicyActionConfig {
    /// Tier used by `ARCHIVE` actions.
    pub const ARCHIVE_TIER: StorageTier = StorageTier::Glacier;

    /// Creates a `TRANSITION` action.
    #[must_use]
    pub const fn transition(tier: StorageTier) -> Self {
        Self {
            action_type: ActionType::Transition,
            target_tier: Some(tier),
            notify_roles: Vec::new(),
        }
    }

    /// Creates a `NOTIFY` action.
    #[must_use]
    pub fn notify<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action_type: ActionType::Notify,
            target_tier: None,
            notify_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an action that carries no parameters.
    #[must_use]
    pub const fn simple(action_type: ActionType) -> Self {
        Self {
            action_type,
            target_tier: None,
            notify_roles: Vec::new(),
        }
    }

    /// Tier the asset ends up in after this action, if it moves.
    ///
    /// A `TRANSITION` to an unrecognised tier moves nothing.
    #[must_use]
    pub const fn destination_tier(&self) -> Option<StorageTier> {
        match self.action_type {
            ActionType::Transition => match self.target_tier {
                Some(StorageTier::Unknown) | None => None,
                tier => tier,
            },
            ActionType::Archive => Some(Self::ARCHIVE_TIER),
            ActionType::Restore => Some(StorageTier::Hot),
            _ => None,
        }
    }
}

impl fmt::Display for PolicyActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.action_type, self.target_tier) {
            (ActionType::Transition, Some(tier)) => write!(f, "TRANSITION -> {tier}"),
            (ActionType::Notify, _) if !self.notify_roles.is_empty() => {
                write!(f, "NOTIFY {}", self.notify_roles.join(", "))
            }
            (action_type, _) => write!(f, "{action_type}"),
        }
    }
}

/// Optional filter narrowing the assets a policy considers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyScope {
    /// Asset types in scope; empty means all.
    #[serde(default)]
    pub asset_types: Vec<String>,
}

/// A named storage lifecycle rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageLifecyclePolicy {
    /// Record identifier.
    #[serde(default)]
    pub id: String,
    /// Owning organization.
    #[serde(default)]
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Policy category.
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// Inactive policies never match.
    #[serde(default)]
    pub is_active: bool,
    /// Lower number = evaluated first.
    #[serde(default)]
    pub priority: i64,
    /// Conditions, all of which must hold.
    #[serde(default)]
    pub conditions: Vec<PolicyCondition>,
    /// Actions applied in order when the conditions hold.
    #[serde(default)]
    pub actions: Vec<PolicyActionConfig>,
    /// Asset filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<PolicyScope>,
    /// Run schedule.
    #[serde(default)]
    pub schedule: PolicySchedule,
    /// Incremented on every edit.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Allows an empty condition list to pass validation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unconditional: bool,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last edit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_version() -> u32 {
    1
}

impl StorageLifecyclePolicy {
    /// Creates an inactive policy with no conditions or actions.
    #[must_use]
    pub fn new(name: impl Into<String>, policy_type: PolicyType) -> Self {
        Self {
            id: String::new(),
            organization_id: String::new(),
            name: name.into(),
            description: None,
            policy_type,
            is_active: false,
            priority: 0,
            conditions: Vec::new(),
            actions: Vec::new(),
            scope: None,
            schedule: PolicySchedule::default(),
            version: 1,
            unconditional: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the record id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the owning organization.
    #[must_use]
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = organization_id.into();
        self
    }

    /// Adds a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Appends a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: PolicyCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action(mut self, action: PolicyActionConfig) -> Self {
        self.actions.push(action);
        self
    }

    /// Restricts the policy to the given asset types.
    #[must_use]
    pub fn with_scope<I, S>(mut self, asset_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = Some(PolicyScope {
            asset_types: asset_types.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Sets the run schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: PolicySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Marks the policy as intentionally condition-free.
    #[must_use]
    pub const fn unconditional(mut self) -> Self {
        self.unconditional = true;
        self
    }

    /// Activates the policy.
    #[must_use]
    pub const fn activate(mut self) -> Self {
        self.is_active = true;
        self
    }

    /// Asset types in scope, empty when unscoped.
    #[must_use]
    pub fn scoped_asset_types(&self) -> &[String] {
        self.scope.as_ref().map_or(&[], |s| s.asset_types.as_slice())
    }

    /// Returns true if any action is a `LOCK`.
    #[must_use]
    pub fn locks(&self) -> bool {
        self.actions.iter().any(|a| a.action_type == ActionType::Lock)
    }

    /// Returns true for legal-hold policies that lock assets.
    #[must_use]
    pub fn is_legal_hold_lock(&self) -> bool {
        self.policy_type == PolicyType::LegalHold && self.locks()
    }

    /// Returns true if the policy matches every in-scope asset.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.conditions.is_empty() && self.scoped_asset_types().is_empty()
    }
}
