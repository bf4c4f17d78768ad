//! One-time config initialization.
//!
//! A [`Provider`] builds its config on the first call to [`Provider::get`] and
//! caches the outcome, success or failure. Layers are applied in this order:
//!
//! ```text
//! factory (default_fn or T::default())
//!        ↓ model defaults fill zero values
//! config file (sparse overlay; created when persistent and missing)
//!        ↓ overridden by
//! environment variables
//!        ↓ checked by
//! model validation
//! ```

use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::builder::{Factory, ModelInit};
use crate::env::EnvSource;
use crate::error::ConfigError;
use crate::fields::EnvField;
use crate::file;
use crate::overrides;
use crate::resolve::{self, ResolveInput};
use crate::streams::Streams;
use crate::types::Loaded;

/// Lazily initialized configuration. Build one with
/// [`Envfig::builder`](crate::Envfig::builder).
///
/// `get` is safe to call from many threads. The first caller runs
/// initialization while the rest block, and every caller observes the same
/// result.
pub struct Provider<T> {
    pub(crate) resolve: ResolveInput,
    pub(crate) factory: Factory<T>,
    pub(crate) streams: Box<dyn Streams>,
    pub(crate) model_init: Option<ModelInit<T>>,
    pub(crate) env: Box<dyn EnvSource + Send + Sync>,
    pub(crate) strict: bool,
    pub(crate) state: OnceLock<Result<Loaded<T>, ConfigError>>,
}

impl<T> Provider<T>
where
    T: EnvField + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// The initialized config, its file path, and whether the file was created.
    pub fn get(&self) -> Result<&Loaded<T>, &ConfigError> {
        self.state.get_or_init(|| self.initialize()).as_ref()
    }

    /// Shorthand for `get().map(|loaded| &loaded.config)`.
    pub fn config(&self) -> Result<&T, &ConfigError> {
        self.get().map(|loaded| &loaded.config)
    }

    fn initialize(&self) -> Result<Loaded<T>, ConfigError> {
        tracing::debug!("initializing config");
        let mut config = (self.factory)();

        let model = match &self.model_init {
            Some(init) => {
                let model = init(&config).map_err(ConfigError::ModelInit)?;
                model.set_defaults(&mut config)?;
                Some(model)
            }
            None => None,
        };

        let path = resolve::resolve_config_path(&self.resolve, &*self.env, &*self.streams)?;
        let mut file_created = false;
        if let Some(path) = &path {
            file_created = self.load_or_create(path, &mut config)?;
        }

        let prefix = self.resolve.env_prefix.as_deref().unwrap_or("");
        overrides::apply_env_overrides_from(&mut config, prefix, &*self.env);

        if let Some(model) = &model {
            model.validate(&config)?;
        }

        tracing::debug!(file_created, "config initialized");
        Ok(Loaded {
            config,
            path,
            file_created,
        })
    }

    /// Returns whether the file was created.
    fn load_or_create(&self, path: &Path, config: &mut T) -> Result<bool, ConfigError> {
        match file::load_from_file(path, config, self.strict) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "config file loaded");
                if self.resolve.persist {
                    self.streams
                        .out(&format!("config: loaded from {}", path.display()));
                }
                Ok(false)
            }
            Err(e) if e.is_not_found() && self.resolve.persist => {
                file::ensure_path(path).map_err(|e| ConfigError::EnsureConfigDir {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                })?;
                file::write_to_file(path, &*config)?;
                tracing::debug!(path = %path.display(), "config file created");
                self.streams
                    .out(&format!("config: created new config at {}", path.display()));
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path.display(), "no config file, continuing without it");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
