//! Error types for evaluator helpers.
//!
//! Evaluation itself never fails; only parsing of display strings does.

use thiserror::Error;

/// Errors that can occur while parsing formatted values.
#[derive(Debug, Error)]
pub enum Error {
    /// Text is not a formatted currency amount.
    #[error("invalid currency amount '{0}'")]
    InvalidCurrency(String),
}

/// Result type alias for evaluator helpers.
pub type Result<T> = std::result::Result<T, Error>;
