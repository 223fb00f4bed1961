//! Decoders for individual inventory cells.
//!
//! These are pure functions from a raw cell to a typed value. The record
//! ingestion step composes them field by field.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

/// Separator used by list-valued columns such as `nameservers` and `labels`.
pub const LIST_SEPARATOR: char = '|';

/// Decode a pipe-delimited list cell.
///
/// An empty cell yields an empty list rather than a list holding one empty
/// string. Elements are otherwise kept verbatim, so joining the result with
/// `|` reproduces any non-empty input.
#[must_use]
pub fn decode_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// Expand a leading `~` to the current user's home directory.
///
/// Only `~` and `~/...` are supported. `~user` forms are rejected.
///
/// # Errors
///
/// Returns [`Error::HomeExpansion`] if the home directory cannot be
/// determined or the path names another user's home.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    let rest = if rest.is_empty() {
        rest
    } else if let Some(stripped) = rest.strip_prefix('/') {
        stripped
    } else {
        return Err(Error::HomeExpansion {
            path: path.to_string(),
            reason: "user-specific home directories are not supported",
        });
    };

    let home = dirs::home_dir().ok_or_else(|| Error::HomeExpansion {
        path: path.to_string(),
        reason: "home directory could not be determined",
    })?;

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

/// Load an SSH public key from a file path.
///
/// An empty path leaves the key unset. The file contents are used as-is;
/// nothing checks that they form a valid public key.
///
/// # Errors
///
/// Returns [`Error::HomeExpansion`] if `~` cannot be expanded and
/// [`Error::SshKeyRead`] if the file cannot be read.
pub fn decode_ssh_key(path: &str) -> Result<Option<String>> {
    if path.is_empty() {
        return Ok(None);
    }

    let expanded = expand_home(path)?;
    debug!(path = %expanded.display(), "Reading ssh public key");

    let key = std::fs::read_to_string(&expanded).map_err(|source| Error::SshKeyRead {
        path: expanded,
        source,
    })?;

    Ok(Some(key))
}
