//! Single-condition evaluation.
//!
//! Every field declares a [`ValueKind`]. Both the asset's value and the
//! condition operand go through one coercion step into that kind before
//! they are compared; if either side cannot be coerced the condition fails
//! closed.

use lifecycle_policy::{AssetContext, Operator, PolicyCondition, Value, ValueKind};
use tracing::trace;

/// A value after coercion to its field's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scalar<'a> {
    Number(f64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> Scalar<'a> {
    fn coerce(kind: ValueKind, value: &'a Value) -> Option<Self> {
        match kind {
            ValueKind::Number => value.as_number().map(Self::Number),
            ValueKind::Bool => value.as_bool().map(Self::Bool),
            ValueKind::Text => value.as_text().map(Self::Text),
        }
    }

    fn same_as(self, other: Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => (a - b).abs() < f64::EPSILON,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Evaluates one condition against an asset.
///
/// Returns `false` when the field is unknown or missing from the asset, the
/// operator is unknown, or the operands cannot be coerced for the operator.
pub fn evaluate_condition(condition: &PolicyCondition, asset: &AssetContext) -> bool {
    let Some(kind) = condition.field.kind() else {
        trace!(asset = %asset.id, "Unknown condition field");
        return false;
    };
    let Some(actual) = asset.get(condition.field) else {
        trace!(asset = %asset.id, field = %condition.field, "Field missing from asset");
        return false;
    };
    let expected = &condition.value;

    match condition.operator {
        Operator::Equals => typed_equals(kind, actual, expected).unwrap_or(false),
        Operator::NotEquals => typed_equals(kind, actual, expected).is_some_and(|eq| !eq),
        Operator::GreaterThan => compare_numbers(actual, expected, |a, b| a > b),
        Operator::LessThan => compare_numbers(actual, expected, |a, b| a < b),
        Operator::GreaterThanOrEqual => compare_numbers(actual, expected, |a, b| a >= b),
        Operator::LessThanOrEqual => compare_numbers(actual, expected, |a, b| a <= b),
        Operator::Contains => contains(actual, expected),
        Operator::In => membership(kind, actual, expected).unwrap_or(false),
        Operator::NotIn => membership(kind, actual, expected).is_some_and(|found| !found),
        Operator::Unknown => false,
    }
}

/// `None` when either side cannot be coerced to the field's kind.
fn typed_equals(kind: ValueKind, actual: &Value, expected: &Value) -> Option<bool> {
    let actual = Scalar::coerce(kind, actual)?;
    let expected = Scalar::coerce(kind, expected)?;
    Some(actual.same_as(expected))
}

fn compare_numbers(actual: &Value, expected: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    let Some(needle) = scalar_text(expected) else {
        return false;
    };
    match actual {
        Value::Text(haystack) => haystack.contains(needle.as_str()),
        Value::List(items) => items
            .iter()
            .any(|item| scalar_text(item).is_some_and(|text| text == needle)),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// `None` when the asset's value cannot be coerced to the field's kind.
/// A list-valued attribute never coerces, so `in` and `notIn` both fail
/// closed on it; use `contains` for list attributes.
fn membership(kind: ValueKind, actual: &Value, expected: &Value) -> Option<bool> {
    let actual = Scalar::coerce(kind, actual)?;
    let members = member_values(expected);
    Some(
        members
            .iter()
            .filter_map(|member| Scalar::coerce(kind, member))
            .any(|member| member.same_as(actual)),
    )
}

/// Expands an `in`/`notIn` operand: a list, or a comma-separated string.
fn member_values(expected: &Value) -> Vec<Value> {
    match expected {
        Value::List(items) => items.clone(),
        Value::Text(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Value::Text(part.to_string()))
            .collect(),
        scalar => vec![scalar.clone()],
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    value.is_scalar().then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle_policy::ConditionField;
    use proptest::prelude::*;

    fn asset() -> AssetContext {
        AssetContext::new("asset-1")
            .with(ConditionField::DaysSinceLastAccess, 120_i64)
            .with(ConditionField::AccessCount, "3")
            .with(ConditionField::ProjectStatus, "COMPLETED")
            .with(ConditionField::CurrentStorageTier, "HOT")
            .with(ConditionField::MimeType, "video/quicktime")
            .with(ConditionField::IsLegalHold, true)
            .with(ConditionField::HasActiveRights, "false")
    }

    fn check(field: ConditionField, operator: Operator, value: impl Into<Value>) -> bool {
        evaluate_condition(&PolicyCondition::new(field, operator, value), &asset())
    }

    #[test]
    fn membership_fails_closed_on_list_attributes() {
        let tagged = AssetContext::new("tagged")
            .with(ConditionField::ProjectStatus, vec!["ACTIVE", "ON_HOLD"]);
        let operand = vec!["ACTIVE", "COMPLETED"];
        for operator in [Operator::In, Operator::NotIn] {
            let condition = PolicyCondition::new(ConditionField::ProjectStatus, operator, operand.clone());
            assert!(!evaluate_condition(&condition, &tagged), "{condition}");
        }
        let contains = PolicyCondition::new(ConditionField::ProjectStatus, Operator::Contains, "ACTIVE");
        assert!(evaluate_condition(&contains, &tagged));
    }

    #[test]
    fn equals_is_type_aware() {
        assert!(check(ConditionField::DaysSinceLastAccess, Operator::Equals, 120_i64));
        assert!(check(ConditionField::DaysSinceLastAccess, Operator::Equals, "120"));
        assert!(check(ConditionField::AccessCount, Operator::Equals, 3_i64));
        assert!(check(ConditionField::ProjectStatus, Operator::Equals, "COMPLETED"));
        assert!(!check(ConditionField::ProjectStatus, Operator::Equals, "completed"));
    }

    #[test]
    fn boolean_strings_coerce_for_equality() {
        assert!(check(ConditionField::IsLegalHold, Operator::Equals, "true"));
        assert!(check(ConditionField::HasActiveRights, Operator::Equals, false));
        assert!(!check(ConditionField::IsLegalHold, Operator::Equals, "yes"));
    }

    #[test]
    fn not_equals_fails_closed_on_type_mismatch() {
        assert!(check(ConditionField::ProjectStatus, Operator::NotEquals, "ACTIVE"));
        assert!(!check(ConditionField::IsLegalHold, Operator::NotEquals, "maybe"));
        assert!(!check(ConditionField::DaysSinceLastAccess, Operator::NotEquals, "soon"));
    }

    #[test]
    fn ordering_needs_numbers() {
        assert!(check(ConditionField::DaysSinceLastAccess, Operator::GreaterThan, 90_i64));
        assert!(check(ConditionField::DaysSinceLastAccess, Operator::GreaterThanOrEqual, 120_i64));
        assert!(check(ConditionField::DaysSinceLastAccess, Operator::LessThanOrEqual, "120"));
        assert!(!check(ConditionField::DaysSinceLastAccess, Operator::LessThan, 120_i64));
        assert!(check(ConditionField::AccessCount, Operator::LessThan, 5_i64));
        assert!(!check(ConditionField::ProjectStatus, Operator::GreaterThan, 1_i64));
        assert!(!check(ConditionField::DaysSinceLastAccess, Operator::GreaterThan, "ninety"));
    }

    #[test]
    fn contains_substring_and_list_element() {
        assert!(check(ConditionField::MimeType, Operator::Contains, "video/"));
        assert!(!check(ConditionField::MimeType, Operator::Contains, "image/"));

        let tagged = AssetContext::new("a").with(
            ConditionField::ApprovalStatus,
            vec!["PENDING", "CLIENT_REVIEW"],
        );
        let condition =
            PolicyCondition::new(ConditionField::ApprovalStatus, Operator::Contains, "PENDING");
        assert!(evaluate_condition(&condition, &tagged));
    }

    #[test]
    fn contains_on_numbers_never_matches() {
        assert!(!check(ConditionField::DaysSinceLastAccess, Operator::Contains, "12"));
    }

    #[test]
    fn in_accepts_lists_and_comma_strings() {
        assert!(check(ConditionField::CurrentStorageTier, Operator::In, vec!["HOT", "WARM"]));
        assert!(check(ConditionField::CurrentStorageTier, Operator::In, "WARM, HOT"));
        assert!(!check(ConditionField::CurrentStorageTier, Operator::In, "COLD,GLACIER"));
        assert!(check(ConditionField::DaysSinceLastAccess, Operator::In, "30,120"));
    }

    #[test]
    fn not_in_is_membership_complement() {
        assert!(check(ConditionField::ProjectStatus, Operator::NotIn, "ACTIVE,ON_HOLD"));
        assert!(!check(ConditionField::ProjectStatus, Operator::NotIn, vec!["COMPLETED"]));
    }

    #[test]
    fn missing_field_fails_closed() {
        assert!(!check(ConditionField::DownloadCount, Operator::Equals, 0_i64));
        assert!(!check(ConditionField::DownloadCount, Operator::NotEquals, 0_i64));
        assert!(!check(ConditionField::DownloadCount, Operator::NotIn, "1,2"));
    }

    #[test]
    fn unknown_field_or_operator_never_matches() {
        assert!(!check(ConditionField::Unknown, Operator::Equals, true));
        assert!(!check(ConditionField::IsLegalHold, Operator::Unknown, true));
    }

    proptest! {
        #[test]
        fn equals_and_not_equals_are_complements(days in 0u32..10_000, probe in 0u32..10_000) {
            let asset = AssetContext::new("p").with(ConditionField::DaysSinceUpload, i64::from(days));
            let eq = PolicyCondition::new(ConditionField::DaysSinceUpload, Operator::Equals, i64::from(probe));
            let ne = PolicyCondition::new(ConditionField::DaysSinceUpload, Operator::NotEquals, i64::from(probe));
            prop_assert_ne!(evaluate_condition(&eq, &asset), evaluate_condition(&ne, &asset));
        }

        #[test]
        fn matching_value_equals_itself(status in "[A-Z_]{1,12}") {
            let asset = AssetContext::new("p").with(ConditionField::ProjectStatus, status.as_str());
            let eq = PolicyCondition::new(ConditionField::ProjectStatus, Operator::Equals, status.as_str());
            let ne = PolicyCondition::new(ConditionField::ProjectStatus, Operator::NotEquals, status.as_str());
            prop_assert!(evaluate_condition(&eq, &asset));
            prop_assert!(!evaluate_condition(&ne, &asset));
        }

        #[test]
        fn in_and_not_in_are_complements(tier in "(HOT|WARM|COLD|GLACIER|DEEP_ARCHIVE)", list in "(HOT|COLD)(,(WARM|GLACIER))?") {
            let asset = AssetContext::new("p").with(ConditionField::CurrentStorageTier, tier.as_str());
            let is_in = PolicyCondition::new(ConditionField::CurrentStorageTier, Operator::In, list.as_str());
            let not_in = PolicyCondition::new(ConditionField::CurrentStorageTier, Operator::NotIn, list.as_str());
            prop_assert_ne!(evaluate_condition(&is_in, &asset), evaluate_condition(&not_in, &asset));
        }
    }
}
