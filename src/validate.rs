//! Strict-mode deserialization: detect unknown keys in config files.
//!
//! Uses `serde_ignored` to deserialize the merged value tree into the target
//! type and capture every key the type doesn't consume. Keys are reported as
//! dotted paths.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConfigError;

/// Deserialize `value` into `T`, failing with [`ConfigError::UnknownKeys`] when
/// it contains keys `T` does not declare.
pub fn deserialize_strict<T: DeserializeOwned>(value: Value, path: &Path) -> Result<T, ConfigError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let parsed: T = serde_ignored::deserialize(value, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if unknown_keys.is_empty() {
        return Ok(parsed);
    }

    Err(ConfigError::UnknownKeys {
        path: path.to_path_buf(),
        keys: unknown_keys,
    })
}

/// Deserialize `value` into `T`, silently ignoring unknown keys.
pub fn deserialize_lenient<T: DeserializeOwned>(value: Value, path: &Path) -> Result<T, ConfigError> {
    serde_json::from_value(value).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}
