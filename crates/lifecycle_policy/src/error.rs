//! Error types for lifecycle policy loading and templating.

use thiserror::Error;

/// Errors that can occur while loading or building policies.
#[derive(Debug, Error)]
pub enum Error {
    /// Policy document is not valid YAML for the policy schema.
    #[error("invalid policy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Policy document is not valid JSON for the policy schema.
    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested template does not exist in the library.
    #[error("unknown policy template: {0}")]
    UnknownTemplate(String),

    /// String does not name a storage tier.
    #[error("invalid storage tier '{0}'")]
    InvalidTier(String),
}

/// Result type alias for lifecycle policy operations.
pub type Result<T> = std::result::Result<T, Error>;
