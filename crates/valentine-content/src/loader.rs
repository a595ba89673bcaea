//! Loading and fingerprinting card scripts.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::card::CardScript;
use crate::error::ContentError;

const EMBEDDED: &str = include_str!("../assets/card.yaml");

/// Where a card script came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSource {
    /// The copy compiled into the binary.
    Embedded,
    /// A file on disk.
    File(PathBuf),
}

/// A parsed, validated card script.
#[derive(Debug, Clone)]
pub struct LoadedCard {
    /// The script.
    pub script: CardScript,
    /// Hex SHA-256 of the source document.
    pub fingerprint: String,
    /// Where it came from.
    pub source: CardSource,
}

/// Hex SHA-256 of a document.
#[must_use]
pub fn fingerprint(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

/// Parses and validates a YAML card script.
///
/// # Errors
///
/// Returns `ContentError::Parse` for malformed YAML and
/// `ContentError::Invalid` for a script that cannot be played.
pub fn parse(source: &str) -> Result<CardScript, ContentError> {
    let script: CardScript = serde_yaml::from_str(source)?;
    script.validate()?;
    debug!(stages = script.stages.len(), "card script parsed");
    Ok(script)
}

/// The card compiled into the binary.
///
/// # Errors
///
/// Returns a `ContentError` only if the embedded document is broken.
pub fn embedded() -> Result<LoadedCard, ContentError> {
    Ok(LoadedCard {
        script: parse(EMBEDDED)?,
        fingerprint: fingerprint(EMBEDDED),
        source: CardSource::Embedded,
    })
}

/// Reads a card script from disk.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read, otherwise as
/// [`parse`].
#[instrument(fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<LoadedCard, ContentError> {
    let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LoadedCard {
        script: parse(&source)?,
        fingerprint: fingerprint(&source),
        source: CardSource::File(path.to_path_buf()),
    })
}
