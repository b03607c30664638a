//! Layered configuration for Rust services.
//!
//! A record is filled from up to three sources applied in a fixed order: a
//! YAML or JSON file, process environment variables, and a Vault secret
//! store. Each source is a [`Reader`] that overlays values onto the record in
//! place, and [`Tuner`] composes them so that the last source applied wins.
//!
//! File and environment values are decoded through serde and Figment. Secret
//! values are bound onto fields marked with `#[vault("key")]` by the
//! [`SecretFields`](derive@SecretFields) derive, with type-directed coercion
//! of the loosely typed values a secret store returns.
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use tuner::{Reader, SecretFields, Tuner, VaultConfig};
//!
//! #[derive(Default, Deserialize, Serialize, SecretFields)]
//! struct Settings {
//!     host: String,
//!     #[vault("db_password")]
//!     db_password: String,
//! }
//!
//! let mut settings = Settings::default();
//! Tuner::new()
//!     .from_file("settings.yaml")?
//!     .from_env_prefixed("APP_")
//!     .from_vault(&VaultConfig::new("secret/app", "s.token"))?
//!     .read(&mut settings)?;
//! # Ok::<_, tuner::TunerError>(())
//! ```

extern crate self as tuner;

pub use tuner_macros::SecretFields;

mod bind;
mod coerce;
mod compose;
mod env;
mod error;
mod file;
mod reader;
mod result_ext;
mod secret;
mod value;

pub use bind::{ApplyFn, FieldDescriptor, SecretFields, bind, bind_with};
pub use coerce::{CoerceError, NumericMode, SecretScalar, coerce};
pub use compose::Tuner;
pub use env::EnvReader;
pub use error::{BoxedCause, RemoteError, TunerError};
#[cfg(feature = "yaml")]
pub use file::SaphyrYaml;
pub use file::FileReader;
pub use reader::{Reader, SourceKind};
pub use result_ext::{FigmentResultExt, TunerResultExt};
#[cfg(feature = "vault-http")]
pub use secret::VaultClient;
pub use secret::{
    DEFAULT_ADDRESS, KvVersion, SecretClient, SecretReader, TlsConfig, VaultConfig,
};
pub use value::{FieldKind, RawValue, Scalar, SecretMap};

/// Result alias used throughout the crate.
pub type TunerResult<T> = Result<T, TunerError>;
