//! Error types for manifest generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while generating manifests.
///
/// Every variant is fatal: the run stops at the first error and files
/// written for earlier records are left in place.
#[derive(Debug, Error)]
pub enum Error {
    /// The CSV inventory could not be opened.
    #[error("failed to open inventory {}: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row or column of the inventory could not be parsed.
    #[error("failed to parse inventory: {0}")]
    InputParse(#[from] csv::Error),

    /// The hostname cannot be used as an output directory name.
    #[error("invalid hostname {hostname:?}: {reason}")]
    InvalidHostname {
        hostname: String,
        reason: &'static str,
    },

    /// The per-record output directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The SSH public key file is missing or unreadable.
    #[error("failed to read ssh public key {}: {source}", path.display())]
    SshKeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A leading `~` could not be expanded.
    #[error("cannot expand home directory in {path:?}: {reason}")]
    HomeExpansion { path: String, reason: &'static str },

    /// A generated manifest could not be written.
    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be converted to YAML.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
