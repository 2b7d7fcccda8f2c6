//! Loosely typed values carried by conditions and asset attributes.
//!
//! Form input and CSV cells arrive as strings, so the accessors here accept
//! numeric-looking strings as numbers and `"true"`/`"false"` as booleans.
//! No other coercion happens.

use crate::model::ValueKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A condition operand or asset attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    Text(String),
    /// List of values (used by `in`/`notIn` and list attributes).
    List(Vec<Value>),
}

impl Value {
    /// Returns the value as a number, parsing numeric-looking strings.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Returns the value as a boolean, accepting `"true"`/`"false"` strings.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Returns the string contents of a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true if the value coerces to the given kind.
    #[must_use]
    pub fn conforms_to(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Number => self.as_number().is_some(),
            ValueKind::Bool => self.as_bool().is_some(),
            ValueKind::Text => self.as_text().is_some(),
        }
    }

    /// Returns true for scalar (non-list) values.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(Value::from(" 90 ").as_number(), Some(90.0));
        assert_eq!(Value::from("1.5e3").as_number(), Some(1500.0));
        assert_eq!(Value::from("ninety").as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn boolean_strings_coerce() {
        assert_eq!(Value::from("true").as_bool(), Some(true));
        assert_eq!(Value::from("FALSE").as_bool(), Some(false));
        assert_eq!(Value::from("yes").as_bool(), None);
        assert_eq!(Value::Number(1.0).as_bool(), None);
    }

    #[test]
    fn untagged_deserialisation_picks_variant() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 12, "HOT", ["a", 1]]"#).unwrap();
        assert_eq!(values[0], Value::Bool(true));
        assert_eq!(values[1], Value::Number(12.0));
        assert_eq!(values[2], Value::from("HOT"));
        assert_eq!(
            values[3],
            Value::List(vec![Value::from("a"), Value::Number(1.0)])
        );
    }

    #[test]
    fn conformance_follows_coercion() {
        assert!(Value::from("42").conforms_to(ValueKind::Number));
        assert!(Value::from("true").conforms_to(ValueKind::Bool));
        assert!(!Value::Number(1.0).conforms_to(ValueKind::Text));
        assert!(!Value::from(vec!["a"]).conforms_to(ValueKind::Text));
    }

    #[test]
    fn display_lists() {
        let value = Value::from(vec!["ACTIVE", "ON_HOLD"]);
        assert_eq!(value.to_string(), "[ACTIVE, ON_HOLD]");
    }
}
