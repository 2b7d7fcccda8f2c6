//! Loading and saving policy documents.
//!
//! A document holds either a single policy record or a list of them:
//!
//! ```yaml
//! - name: Legal hold lock
//!   type: LEGAL_HOLD
//!   isActive: true
//!   priority: 1
//!   conditions:
//!     - field: isLegalHold
//!       operator: equals
//!       value: true
//!   actions:
//!     - type: LOCK
//! ```

use crate::error::Result;
use crate::model::StorageLifecyclePolicy;

/// Parses a YAML document holding one policy or a list of policies.
///
/// # Errors
///
/// Returns an error if the YAML does not describe policy records. The error
/// names the record field that failed.
pub fn parse_policies_yaml(input: &str) -> Result<Vec<StorageLifecyclePolicy>> {
    let document: serde_yaml::Value = serde_yaml::from_str(input)?;
    if document.is_sequence() {
        Ok(serde_yaml::from_value(document)?)
    } else {
        Ok(vec![serde_yaml::from_value(document)?])
    }
}

/// Parses a JSON document holding one policy or a list of policies.
///
/// # Errors
///
/// Returns an error if the JSON does not describe policy records.
pub fn parse_policies_json(input: &str) -> Result<Vec<StorageLifecyclePolicy>> {
    if input.trim_start().starts_with('[') {
        Ok(serde_json::from_str(input)?)
    } else {
        Ok(vec![serde_json::from_str(input)?])
    }
}

/// Serialises policies to a YAML list.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn to_yaml(policies: &[StorageLifecyclePolicy]) -> Result<String> {
    Ok(serde_yaml::to_string(policies)?)
}
