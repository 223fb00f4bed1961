//! YAML rendering for generated documents.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Render a document as YAML.
///
/// The document is first converted to a [`serde_json::Value`], which keeps
/// integers and floats distinct, and that value is then emitted as YAML.
/// This keeps fields such as the DHCP lease time as exact integers.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if either conversion fails or the
/// document serializes to nothing.
pub fn to_yaml<T: Serialize>(document: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(document)?;
    if value.is_null() {
        return Err(Error::Serialization("document serialized to null".to_string()));
    }

    let yaml = serde_yaml::to_string(&value)?;
    Ok(yaml.into_bytes())
}
