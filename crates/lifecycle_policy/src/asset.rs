//! Flattened asset view consumed by the evaluator.

use crate::model::ConditionField;
use crate::tier::StorageTier;
use crate::value::Value;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Key/value view of one stored asset.
///
/// Attribute keys are the `PolicyCondition.field` wire names
/// (`daysSinceLastAccess`, `isLegalHold`, ...). How they are joined from the
/// underlying asset and project records is not this crate's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetContext {
    /// Asset identifier.
    pub id: String,
    /// Asset type used by policy scopes (e.g. `video`, `image`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    /// Attribute values keyed by field name. Null values load as absent.
    #[serde(flatten, deserialize_with = "skip_nulls")]
    pub attributes: BTreeMap<String, Value>,
}

fn skip_nulls<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<Value>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect())
}

impl AssetContext {
    /// Creates an asset with no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            asset_type: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the asset type.
    #[must_use]
    pub fn with_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = Some(asset_type.into());
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with(mut self, field: ConditionField, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets an attribute in place.
    pub fn set(&mut self, field: ConditionField, value: impl Into<Value>) {
        self.attributes
            .insert(field.as_str().to_string(), value.into());
    }

    /// Looks up the value of a condition field.
    #[must_use]
    pub fn get(&self, field: ConditionField) -> Option<&Value> {
        if field == ConditionField::Unknown {
            return None;
        }
        self.attributes.get(field.as_str())
    }

    /// Size in bytes, if known.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn file_size(&self) -> Option<u64> {
        self.get(ConditionField::FileSize)
            .and_then(Value::as_number)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64)
    }

    /// Tier the asset currently lives in, if known.
    #[must_use]
    pub fn current_tier(&self) -> Option<StorageTier> {
        self.get(ConditionField::CurrentStorageTier)
            .and_then(Value::as_text)
            .and_then(|s| s.parse().ok())
    }

    /// Returns true if the asset is flagged as under legal hold.
    #[must_use]
    pub fn is_legal_hold(&self) -> bool {
        self.get(ConditionField::IsLegalHold)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
