//! Typed application configuration from defaults, one config file, and
//! environment variables, initialized once.
//!
//! ```ignore
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct AppConfig {
//!     name: String,
//!     port: u16,
//!     database: Option<Database>,
//! }
//!
//! envfig::env_struct!(AppConfig { name, port, database => "DB" });
//!
//! let provider = Envfig::builder::<AppConfig>()
//!     .persistence("myapp")
//!     .env_prefix("MYAPP")
//!     .build()?;
//! let config = provider.config()?;
//! ```
//!
//! The first `get` reads `~/.config/myapp/config.yml` (creating it if it's
//! missing), applies `MYAPP_NAME`, `MYAPP_PORT`, and `MYAPP_DB_*` on top, and
//! caches the result for every later caller.
//!
//! # Layer precedence
//!
//! ```text
//! Factory               .default_fn() or T::default()
//!        ↑ zero values filled by
//! Model defaults        .model()
//!        ↑ overridden by
//! Config file           sparse overlay
//!        ↑ overridden by
//! Environment vars      PREFIX_SEGMENT[_SEGMENT...]
//!        ↓ checked by
//! Model validation
//! ```
//!
//! The config file is **sparse**: keys it doesn't mention keep the values the
//! factory and model defaults produced.
//!
//! # Config file
//!
//! The path comes from `{PREFIX}_CONFIG_PATH` when a prefix is set and the
//! variable is non-empty. Otherwise, with [`.persistence()`](ProviderBuilder::persistence),
//! it is `<user config dir>/<dir name>/config.yml`, where the user config dir is
//! `XDG_CONFIG_HOME` or the platform default. Without either, no file is read.
//!
//! The format follows the extension: `.yaml`/`.yml`, `.json`, or `.toml`. In
//! persistent mode a missing file is created from the object as it stands
//! after defaults, written through a temp file and an atomic rename.
//!
//! `Duration` fields need `#[serde(with = "humantime_serde")]` to be stored in
//! the file as `2s` or `1h 30m`, the same grammar the environment accepts:
//!
//! ```ignore
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Server {
//!     #[serde(with = "humantime_serde")]
//!     timeout: Duration,
//! }
//! ```
//!
//! Loading round-trips the object through serde, so `#[serde(skip)]` fields
//! come back as their `Default` whenever a file is read.
//!
//! Strict mode is **off by default**. With [`.strict(true)`](ProviderBuilder::strict),
//! keys in the file that the struct doesn't declare fail initialization.
//!
//! # Environment variables
//!
//! Fields are registered with [`env_struct!`]. Each field contributes one name
//! segment: its tag if given, otherwise its identifier in upper snake case
//! (`apiKey2FA` → `API_KEY2FA`; a boundary only where a lowercase letter is
//! followed by an uppercase one). Nested structs add their own segment:
//!
//! | Field | Env var (prefix `MYAPP`) |
//! |-------|--------------------------|
//! | `port` | `MYAPP_PORT` |
//! | `database.url` (tag `DB`) | `MYAPP_DB_URL` |
//!
//! The tag `"-"` excludes a field, including everything below it.
//!
//! Supported field types are `String`, `bool`, the integer types, and
//! `Duration` (`1h30m`, `500ms`), plus `Option` of each and `Option` of a
//! registered struct. Values that fail to parse are ignored, as are negative
//! values for unsigned fields: the field keeps its previous value.
//!
//! An `Option` is only allocated when the environment has data for it. For an
//! optional scalar, its variable must be present and parse. For an optional
//! struct, any variable starting with its name plus `_` is enough.
//!
//! # Defaults and validation
//!
//! A [`Model`] fills zero-valued fields before the file is read and validates
//! the final object. [`Rules`] builds one from closures:
//!
//! ```ignore
//! let provider = Envfig::builder::<AppConfig>()
//!     .model(|_| {
//!         Ok(Box::new(
//!             Rules::new()
//!                 .default_value("port", |c: &mut AppConfig| &mut c.port, 8080)
//!                 .check("name", |c: &AppConfig| !c.name.is_empty(), "must not be empty"),
//!         ))
//!     })
//!     .build()?;
//! ```
//!
//! # Notices
//!
//! "created new config", "loaded from", and the missing-user-dir warning go to
//! a [`Streams`] implementation. They are dropped unless one is configured.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigError`]. Initialization failures are
//! cached: every later `get` returns the same error.

pub mod error;
pub mod types;

mod builder;
mod decode;
mod env;
mod fields;
mod file;
pub(crate) mod merge;
mod model;
pub mod naming;
mod overrides;
mod provider;
mod resolve;
mod streams;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{Envfig, ProviderBuilder};
pub use env::{EnvSnapshot, EnvSource, ProcessEnv};
pub use error::{BoxError, ConfigError};
pub use fields::{
    EnvField, EnvStruct, FieldMeta, NestedStruct, OptionalScalar, OptionalStruct, ScalarKind,
    Shape, SignedInt, Slot, UnsignedInt,
};
pub use file::{ensure_path, load_from_file, write_to_file};
pub use model::{FieldIssue, Model, Rules, ValidationError};
pub use overrides::{apply_env_overrides, apply_env_overrides_from};
pub use provider::Provider;
pub use resolve::{CONFIG_FILE_NAME, ResolveInput, resolve_config_path};
pub use streams::{Buffers, Discard, StdStreams, Streams, Tracing, Writers};
pub use types::{Format, Loaded};
