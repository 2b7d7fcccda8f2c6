//! Validation result types.

use serde::{Deserialize, Serialize};

/// Structural validation outcome for one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when `errors` is empty.
    pub valid: bool,
    /// Human-readable problems that block saving or activation.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Builds a report from collected errors.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Findings across a whole policy set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySetReport {
    /// Critical findings; the set must not be scheduled.
    pub violations: Vec<Violation>,
    /// Non-blocking findings.
    pub warnings: Vec<Warning>,
}

impl PolicySetReport {
    /// Returns true if nothing blocks scheduling.
    #[must_use]
    pub fn is_schedulable(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if there are no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.warnings.is_empty()
    }
}

/// A critical finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Which check failed.
    pub check: String,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// A non-critical finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Which check produced the warning.
    pub check: String,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

/// Severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks scheduling.
    Critical,
    /// Noted but not blocking.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "CRITICAL"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}

impl Violation {
    /// Creates a new critical violation.
    #[must_use]
    pub fn critical(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            severity: Severity::Critical,
            message: message.into(),
        }
    }
}

impl Warning {
    /// Creates a new warning.
    #[must_use]
    pub fn new(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}
