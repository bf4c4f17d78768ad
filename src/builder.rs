use std::sync::OnceLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::{BoxError, ConfigError};
use crate::fields::EnvField;
use crate::model::Model;
use crate::provider::Provider;
use crate::resolve::ResolveInput;
use crate::streams::{Discard, Streams};

pub(crate) type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
pub(crate) type ModelInit<T> =
    Box<dyn Fn(&T) -> Result<Box<dyn Model<T>>, BoxError> + Send + Sync>;

/// Entry point for building an envfig provider.
pub struct Envfig;

impl Envfig {
    pub fn builder<T>() -> ProviderBuilder<T>
    where
        T: EnvField + Serialize + DeserializeOwned + Default + Send + Sync + 'static,
    {
        ProviderBuilder::new()
    }
}

/// Builder for a [`Provider`].
///
/// Every setting is optional. With none of them, [`Provider::get`] returns
/// `T::default()` with environment variables applied without a prefix.
pub struct ProviderBuilder<T> {
    dir_name: Option<String>,
    env_prefix: Option<String>,
    factory: Option<Factory<T>>,
    streams: Option<Box<dyn Streams>>,
    model_init: Option<ModelInit<T>>,
    env: Option<Box<dyn EnvSource + Send + Sync>>,
    strict: bool,
}

impl<T> ProviderBuilder<T>
where
    T: EnvField + Serialize + DeserializeOwned + Default + Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            dir_name: None,
            env_prefix: None,
            factory: None,
            streams: None,
            model_init: None,
            env: None,
            strict: false,
        }
    }

    /// Persist the config as `<user config dir>/<dir_name>/config.yml`.
    ///
    /// A missing file is created from the initial object, and failing to find
    /// a user config directory becomes an error.
    pub fn persistence(mut self, dir_name: &str) -> Self {
        self.dir_name = Some(dir_name.to_string());
        self
    }

    /// Prefix for every environment variable, and for the
    /// `{PREFIX}_CONFIG_PATH` path override.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Build the initial object with `factory` instead of `T::default()`.
    pub fn default_fn<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Where notices go (default: dropped).
    pub fn streams<S: Streams + 'static>(mut self, streams: S) -> Self {
        self.streams = Some(Box::new(streams));
        self
    }

    /// Build a [`Model`] from the freshly constructed object. It fills defaults
    /// before the file is read and validates after environment overrides.
    pub fn model<F>(mut self, init: F) -> Self
    where
        F: Fn(&T) -> Result<Box<dyn Model<T>>, BoxError> + Send + Sync + 'static,
    {
        self.model_init = Some(Box::new(init));
        self
    }

    /// Read variables from `env` instead of the process environment.
    pub fn env_source<E: EnvSource + Send + Sync + 'static>(mut self, env: E) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, keys in the config file that `T` doesn't declare are errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Result<Provider<T>, ConfigError> {
        if self.dir_name.as_deref() == Some("") {
            return Err(ConfigError::EmptyDirName);
        }
        if self.env_prefix.as_deref() == Some("") {
            return Err(ConfigError::EmptyEnvPrefix);
        }

        let factory: Factory<T> = match self.factory {
            Some(factory) => factory,
            None => Box::new(T::default),
        };
        let streams: Box<dyn Streams> = match self.streams {
            Some(streams) => streams,
            None => Box::new(Discard),
        };
        let env: Box<dyn EnvSource + Send + Sync> = match self.env {
            Some(env) => env,
            None => Box::new(ProcessEnv),
        };

        let persist = self.dir_name.is_some();
        Ok(Provider {
            resolve: ResolveInput {
                env_prefix: self.env_prefix,
                dir_name: self.dir_name,
                persist,
            },
            factory,
            streams,
            model_init: self.model_init,
            env,
            strict: self.strict,
            state: OnceLock::new(),
        })
    }
}
