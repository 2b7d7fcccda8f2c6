//! Structural validation of a single policy.

use crate::result::ValidationReport;
use lifecycle_policy::{
    ActionType, ConditionField, Operator, PolicyActionConfig, PolicyCondition, PolicyType,
    RunFrequency, StorageLifecyclePolicy, StorageTier, Value, ValueKind,
};
use tracing::debug;

/// Validates one policy before it is saved or activated.
///
/// Never fails: every problem found is reported as a message in the
/// returned [`ValidationReport`], positions counted from 1.
pub fn validate_storage_policy(policy: &StorageLifecyclePolicy) -> ValidationReport {
    let mut errors = Vec::new();

    if policy.name.trim().is_empty() {
        errors.push("Policy name is required".to_string());
    }

    if policy.policy_type == PolicyType::Unknown {
        errors.push("Unrecognized policy type".to_string());
    }

    if policy.conditions.is_empty() && !policy.unconditional {
        errors.push(
            "Policy must have at least one condition or be marked unconditional".to_string(),
        );
    }
    for (i, condition) in policy.conditions.iter().enumerate() {
        if let Some(problem) = check_condition(condition) {
            errors.push(format!("Condition {}: {problem}", i + 1));
        }
    }

    if policy.actions.is_empty() {
        errors.push("Policy must have at least one action".to_string());
    }
    for (i, action) in policy.actions.iter().enumerate() {
        if let Some(problem) = check_action(action) {
            errors.push(format!("Action {}: {problem}", i + 1));
        }
    }

    if policy.priority < 0 {
        errors.push(format!(
            "Priority must be a non-negative integer (got {})",
            policy.priority
        ));
    }

    if policy.schedule.run_frequency == RunFrequency::Unknown {
        errors.push(
            "Schedule run frequency must be one of HOURLY, DAILY, WEEKLY, MONTHLY".to_string(),
        );
    }

    if policy
        .scoped_asset_types()
        .iter()
        .any(|t| t.trim().is_empty())
    {
        errors.push("Scope asset types must not be blank".to_string());
    }

    debug!(policy = %policy.name, errors = errors.len(), "validated policy");
    ValidationReport::from_errors(errors)
}

fn check_condition(condition: &PolicyCondition) -> Option<String> {
    if condition.field == ConditionField::Unknown {
        return Some("unrecognized field".to_string());
    }
    let kind = condition.field.kind()?;
    let field = condition.field;
    let value = &condition.value;

    match condition.operator {
        Operator::Unknown => Some("unrecognized operator".to_string()),
        Operator::Equals | Operator::NotEquals => {
            if value.conforms_to(kind) {
                None
            } else {
                Some(format!("value '{value}' is not a valid {kind} for {field}"))
            }
        }
        op if op.is_ordering() => {
            if kind != ValueKind::Number {
                Some(format!("{op} only applies to numeric fields ({field} is {kind})"))
            } else if value.as_number().is_none() {
                Some(format!("{op} requires a numeric value, got '{value}'"))
            } else {
                None
            }
        }
        Operator::Contains => {
            if kind != ValueKind::Text {
                Some(format!("contains only applies to text fields ({field} is {kind})"))
            } else if value.as_text().is_none() {
                Some(format!("contains requires a text value, got '{value}'"))
            } else {
                None
            }
        }
        op => check_membership(op, kind, field, value),
    }
}

fn check_membership(
    op: Operator,
    kind: ValueKind,
    field: ConditionField,
    value: &Value,
) -> Option<String> {
    let members: Vec<Value> = match value {
        Value::List(items) => items.clone(),
        Value::Text(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Value::from)
            .collect(),
        other => return Some(format!("{op} requires a list, got '{other}'")),
    };
    if members.is_empty() {
        return Some(format!("{op} requires at least one value"));
    }
    members
        .iter()
        .find(|m| !m.conforms_to(kind))
        .map(|m| format!("value '{m}' is not a valid {kind} for {field}"))
}

fn check_action(action: &PolicyActionConfig) -> Option<String> {
    match action.action_type {
        ActionType::Transition if action.target_tier.is_none() => {
            Some("TRANSITION requires a target tier".to_string())
        }
        ActionType::Notify if action.notify_roles.iter().all(|r| r.trim().is_empty()) => {
            Some("NOTIFY requires at least one role".to_string())
        }
        ActionType::Unknown => Some("unrecognized action type".to_string()),
        _ if action.target_tier == Some(StorageTier::Unknown) => {
            Some("unrecognized target tier".to_string())
        }
        _ => None,
    }
}
