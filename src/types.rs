use std::fmt;
use std::path::{Path, PathBuf};

/// On-disk encoding of a config file, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.yaml` or `.yml`.
    Yaml,
    /// `.json`.
    Json,
    /// `.toml`.
    Toml,
}

impl Format {
    /// Detect the format from a path's extension. Matching is exact
    /// (`.YML` is not recognized), and a path without extension yields `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
            Format::Toml => write!(f, "toml"),
        }
    }
}

/// The outcome of a successful [`Provider::get`](crate::Provider::get).
#[derive(Debug)]
pub struct Loaded<T> {
    /// The fully layered configuration.
    pub config: T,
    /// The config file that was read or created, if any.
    pub path: Option<PathBuf>,
    /// Whether the file at `path` was created during this initialization.
    pub file_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_extensions() {
        assert_eq!(Format::from_path(Path::new("a/config.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("config.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("config.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("config.toml")), Some(Format::Toml));
    }

    #[test]
    fn rejects_unknown_or_missing_extension() {
        assert_eq!(Format::from_path(Path::new("config.txt")), None);
        assert_eq!(Format::from_path(Path::new("config")), None);
        assert_eq!(Format::from_path(Path::new("config.YML")), None);
    }
}
