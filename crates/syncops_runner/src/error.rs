//! Error types for runner operations.

use thiserror::Error;

/// Errors that can occur while storing policies, loading inventories or
/// running policies.
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown or unsupported file format.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// Parse error for a specific format.
    #[error("parse error ({format}): {message}")]
    ParseError {
        /// The format that failed to parse.
        format: &'static str,
        /// Description of the parse error.
        message: String,
    },

    /// An active policy failed validation and was not saved.
    #[error("policy '{name}' is invalid: {}", .errors.join("; "))]
    InvalidPolicy {
        /// Policy name.
        name: String,
        /// Validation messages.
        errors: Vec<String>,
    },

    /// A policy id that cannot be used as a storage key.
    #[error("invalid policy id: {0:?}")]
    InvalidId(String),

    /// A parallel evaluation task did not complete.
    #[error("evaluation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Policy document error.
    #[error(transparent)]
    Policy(#[from] lifecycle_policy::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// CSV error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Creates a parse error for the given format.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::ParseError {
            format,
            message: message.into(),
        }
    }
}

/// Result type alias for runner operations.
pub type Result<T> = std::result::Result<T, Error>;
