//! Valentine — player error types.

use thiserror::Error;
use valentine_content::ContentError;
use valentine_core::error::DomainError;

/// Startup and runtime errors for the terminal player.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The card script could not be loaded.
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// A screen could not be built or mounted.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}
