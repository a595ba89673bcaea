//! Content error types.

use std::path::PathBuf;

use valentine_core::error::DomainError;

/// Errors raised while loading a card script.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The file could not be read.
    #[error("failed to read card script {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid card script.
    #[error("card script is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but cannot be played.
    #[error("card script is invalid: {0}")]
    Invalid(#[from] DomainError),
}
