//! Execution log records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one policy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Every qualifying asset was processed.
    Success,
    /// Some assets were processed, some failed.
    Partial,
    /// Errors occurred and nothing was processed.
    Failed,
}

impl ExecutionStatus {
    /// Derives the run status from its counts.
    ///
    /// - `FAILED`: at least one error and nothing transitioned
    /// - `PARTIAL`: at least one error and `0 < transitioned < evaluated`
    /// - `SUCCESS`: otherwise
    #[must_use]
    pub const fn from_outcome(evaluated: usize, transitioned: usize, error_count: usize) -> Self {
        if error_count == 0 {
            Self::Success
        } else if transitioned == 0 {
            Self::Failed
        } else if transitioned < evaluated {
            Self::Partial
        } else {
            Self::Success
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Audit record of one scheduled or manual policy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyExecutionLog {
    /// Log identifier.
    pub id: String,
    /// Policy that ran.
    pub policy_id: String,
    /// Policy name at the time of the run.
    pub policy_name: String,
    /// Owning organization.
    pub organization_id: String,
    /// Run start time.
    pub executed_at: DateTime<Utc>,
    /// Derived outcome.
    pub status: ExecutionStatus,
    /// Assets the policy was evaluated against.
    pub assets_evaluated: usize,
    /// Assets whose actions were all applied.
    pub assets_transitioned: usize,
    /// Non-fatal per-asset problems.
    pub errors: Vec<String>,
    /// Monthly USD delta; negative means the run increased cost.
    pub cost_savings_achieved: f64,
    /// Wall-clock duration of the run.
    pub execution_time_ms: u64,
}

impl PolicyExecutionLog {
    /// Returns true unless the run failed outright.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        !matches!(self.status, ExecutionStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_run_is_success() {
        assert_eq!(ExecutionStatus::from_outcome(10, 4, 0), ExecutionStatus::Success);
        assert_eq!(ExecutionStatus::from_outcome(0, 0, 0), ExecutionStatus::Success);
    }

    #[test]
    fn errors_with_some_progress_are_partial() {
        assert_eq!(ExecutionStatus::from_outcome(10, 7, 3), ExecutionStatus::Partial);
    }

    #[test]
    fn errors_without_progress_fail() {
        assert_eq!(ExecutionStatus::from_outcome(10, 0, 1), ExecutionStatus::Failed);
    }

    #[test]
    fn errors_with_full_progress_stay_success() {
        assert_eq!(ExecutionStatus::from_outcome(5, 5, 1), ExecutionStatus::Success);
    }
}
