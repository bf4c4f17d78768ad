//! Config path resolution.
//!
//! Decides which file, if any, the provider reads and creates. No files are
//! touched here; the only inputs are the environment and the platform's user
//! config directory.
//!
//! 1. `{PREFIX}_CONFIG_PATH`, when a prefix is configured and the variable is
//!    non-empty.
//! 2. Nothing, when no persistence directory name is configured.
//! 3. `<user config dir>/<dir name>/config.yml`, where the user config dir is
//!    `XDG_CONFIG_HOME` if non-empty, else the platform default.

use std::path::PathBuf;

use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::streams::Streams;

/// File name used inside the persistence directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Suffix appended to the env prefix to form the path override variable.
pub const CONFIG_PATH_SUFFIX: &str = "_CONFIG_PATH";

const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Settings that drive resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    pub env_prefix: Option<String>,
    pub dir_name: Option<String>,
    /// Whether a missing user config dir is fatal.
    pub persist: bool,
}

/// Name of the variable that overrides the config path for `prefix`.
pub fn config_path_var(prefix: &str) -> String {
    format!("{prefix}{CONFIG_PATH_SUFFIX}")
}

/// Resolve the config path using the platform's user config directory.
pub fn resolve_config_path(
    input: &ResolveInput,
    env: &dyn EnvSource,
    streams: &dyn Streams,
) -> Result<Option<PathBuf>, ConfigError> {
    resolve_config_path_with(input, env, streams, platform_config_dir)
}

/// Like [`resolve_config_path`], with the platform lookup supplied by the caller.
pub fn resolve_config_path_with<P>(
    input: &ResolveInput,
    env: &dyn EnvSource,
    streams: &dyn Streams,
    platform_dir: P,
) -> Result<Option<PathBuf>, ConfigError>
where
    P: FnOnce() -> Result<PathBuf, String>,
{
    if let Some(prefix) = input.env_prefix.as_deref().filter(|p| !p.is_empty()) {
        if let Some(path) = env.var(&config_path_var(prefix)).filter(|p| !p.is_empty()) {
            tracing::debug!(path = %path, "config path taken from environment");
            return Ok(Some(PathBuf::from(path)));
        }
    }

    let Some(dir_name) = input.dir_name.as_deref().filter(|d| !d.is_empty()) else {
        return Ok(None);
    };

    let user_dir = match env.var(XDG_CONFIG_HOME).filter(|d| !d.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => match platform_dir() {
            Ok(dir) => dir,
            Err(reason) if input.persist => return Err(ConfigError::UserConfigDir { reason }),
            Err(reason) => {
                streams.err_out(&format!(
                    "config: warning: cannot determine user config dir ({reason}); \
                     proceeding without reading a config file"
                ));
                return Ok(None);
            }
        },
    };

    Ok(Some(user_dir.join(dir_name).join(CONFIG_FILE_NAME)))
}

fn platform_config_dir() -> Result<PathBuf, String> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| "no valid home directory could be found".to_string())
}
