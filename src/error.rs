use std::path::PathBuf;

use thiserror::Error;

use crate::model::ValidationError;
use crate::types::Format;

/// Boxed error from a format backend or a user-supplied model.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Persistence directory name cannot be empty — pass a name to .persistence()")]
    EmptyDirName,

    #[error("Env prefix cannot be empty — pass a prefix to .env_prefix()")]
    EmptyEnvPrefix,

    #[error("Unsupported config file type '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Failed to format config as {format}: {source}")]
    Format {
        format: Format,
        #[source]
        source: BoxError,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write to config file {path} ({action}): {source}")]
    Write {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },

    #[error("Unknown keys in config file {path}: {}", .keys.join(", "))]
    UnknownKeys { path: PathBuf, keys: Vec<String> },

    #[error("Inaccessible path {path}")]
    InaccessiblePath { path: PathBuf },

    #[error("Cannot create directories for {path}: {source}")]
    CannotCreateDirectories {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to ensure config dir for {path}: {source}")]
    EnsureConfigDir {
        path: PathBuf,
        source: Box<ConfigError>,
    },

    #[error("Cannot determine user config dir: {reason}")]
    UserConfigDir { reason: String },

    #[error("Failed to initialize config model: {0}")]
    ModelInit(#[source] BoxError),

    #[error("Failed to apply default for '{field}': {reason}")]
    Defaults { field: String, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// True when the error is a read of a config file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
