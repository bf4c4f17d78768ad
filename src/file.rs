//! Reading, writing, and preparing the config file.
//!
//! The on-disk format follows the file extension (see [`Format`]). Loading is a
//! **sparse overlay**: the current object is turned into a value tree, the
//! file's tree is deep-merged on top, and the result is deserialized back. Keys
//! the file doesn't mention keep the values set by the factory and defaults.
//!
//! Writing goes through a temp file in the destination directory followed by a
//! rename, so readers never observe a half-written config.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BoxError, ConfigError};
use crate::merge::deep_merge;
use crate::types::Format;
use crate::validate;

/// Detect the format of `path`, or fail with [`ConfigError::UnsupportedFormat`].
fn format_of(path: &Path) -> Result<Format, ConfigError> {
    Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: dotted_extension(path),
    })
}

fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Parse file content of the given format into a generic value tree.
pub fn parse_value(content: &str, format: Format) -> Result<Value, BoxError> {
    let value = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(content)?,
        Format::Json => serde_json::from_str::<Value>(content)?,
        Format::Toml => toml::from_str::<Value>(content)?,
    };
    Ok(value)
}

/// Serialize `config` in the given format.
pub fn to_string<T: Serialize + ?Sized>(config: &T, format: Format) -> Result<String, ConfigError> {
    let rendered: Result<String, BoxError> = match format {
        Format::Yaml => serde_yaml::to_string(config).map_err(Into::into),
        Format::Json => serde_json::to_string_pretty(config).map_err(Into::into),
        Format::Toml => toml::to_string_pretty(config).map_err(Into::into),
    };
    rendered.map_err(|source| ConfigError::Format { format, source })
}

/// Overlay the file at `path` onto `config`.
///
/// An empty path is a no-op. The extension is checked before the file is read,
/// so an unsupported type fails even when the file is missing. A missing file
/// yields [`ConfigError::Io`] for which [`ConfigError::is_not_found`] is true.
///
/// The object round-trips through serde, so fields marked `#[serde(skip)]`
/// come back as their `Default`. Set such fields after loading, not in the
/// factory or model defaults. `Duration` fields should use
/// `#[serde(with = "humantime_serde")]` to read and write values like `2s`.
pub fn load_from_file<T>(path: &Path, config: &mut T, strict: bool) -> Result<(), ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    let format = format_of(path)?;

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if format == Format::Yaml && content.trim().is_empty() {
        return Ok(());
    }

    let overlay = match parse_value(&content, format) {
        Ok(Value::Object(map)) => map,
        // An empty document changes nothing.
        Ok(Value::Null) => return Ok(()),
        Ok(other) => {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source: format!("expected a mapping at the top level, found {other}").into(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let base = match serde_json::to_value(&*config) {
        Ok(Value::Object(map)) => map,
        Ok(_) => serde_json::Map::new(),
        Err(e) => {
            return Err(ConfigError::Format {
                format,
                source: Box::new(e),
            });
        }
    };

    let merged = Value::Object(deep_merge(base, overlay));
    *config = if strict {
        validate::deserialize_strict(merged, path)?
    } else {
        validate::deserialize_lenient(merged, path)?
    };
    Ok(())
}

/// Serialize `config` and atomically replace the file at `path`.
///
/// A path without extension is written as YAML. The temp file is created next
/// to the destination as `temp-config-*<ext>` and removed if anything fails.
pub fn write_to_file<T: Serialize + ?Sized>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let format = match path.extension() {
        None => Format::Yaml,
        Some(_) => format_of(path)?,
    };
    let data = to_string(config, format)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix("temp-config-")
        .suffix(&dotted_extension(path))
        .tempfile_in(dir)
        .map_err(write_error(path, "create temp file"))?;
    tmp.write_all(data.as_bytes())
        .map_err(write_error(path, "write temp file"))?;
    tmp.as_file()
        .sync_all()
        .map_err(write_error(path, "sync temp file"))?;
    tmp.persist(path)
        .map_err(|e| write_error(path, "rename temp file")(e.error))?;
    Ok(())
}

fn write_error<'a>(path: &'a Path, action: &'static str) -> impl FnOnce(std::io::Error) -> ConfigError + 'a {
    move |source| ConfigError::Write {
        path: path.to_path_buf(),
        action,
        source,
    }
}

/// Make sure `path` can be created as a file: it must not be a directory, and
/// its parent directories are created (mode `0o700` on Unix) when missing.
pub fn ensure_path(path: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(ConfigError::InaccessiblePath {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => return Ok(()),
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            return Err(ConfigError::InaccessiblePath {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {}
    }

    let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| ConfigError::CannotCreateDirectories {
            path: dir.to_path_buf(),
            source: e,
        })
}
