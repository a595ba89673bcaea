//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Submitted answers did not match the expected values.
    #[error("answers did not match")]
    ValidationMismatch,

    /// An input was malformed or referenced something that does not exist.
    #[error("validation error: {0}")]
    Validation(String),

    /// An input arrived in a state that cannot accept it.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A phase script or stage script is structurally invalid.
    #[error("invalid script: {0}")]
    InvalidScript(String),
}
