//! Layering file, environment and secret-store readers over one record.
//!
//! [`Tuner`] applies its configured sources in a fixed order: file, then
//! environment, then secret store. Later sources overwrite values written by
//! earlier ones. Composition stops at the first failing source.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::TunerResult;
use crate::bind::SecretFields;
use crate::env::EnvReader;
use crate::file::FileReader;
use crate::reader::{Reader, SourceKind};
use crate::result_ext::TunerResultExt;
use crate::secret::{SecretClient, SecretReader};
#[cfg(feature = "vault-http")]
use crate::secret::VaultConfig;

type Slot<T> = Option<Box<dyn Reader<T>>>;

/// Composes up to one reader per source into a single [`Reader`].
///
/// # Examples
///
/// ```rust,no_run
/// use serde::{Deserialize, Serialize};
/// use tuner::{Reader, SecretFields, Tuner, VaultConfig};
///
/// #[derive(Default, Deserialize, Serialize, SecretFields)]
/// struct Settings {
///     #[vault("port")]
///     port: i32,
///     name: String,
/// }
///
/// let tuner = Tuner::new()
///     .from_file("settings.yaml")?
///     .from_env_prefixed("APP_")
///     .from_vault(&VaultConfig::new("secret/app", "s.token"))?;
/// let mut settings = Settings::default();
/// tuner.read(&mut settings)?;
/// # Ok::<_, tuner::TunerError>(())
/// ```
pub struct Tuner<T> {
    file: Slot<T>,
    env: Slot<T>,
    secrets: Slot<T>,
}

impl<T> Tuner<T> {
    /// Create a composer with no sources configured.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            file: None,
            env: None,
            secrets: None,
        }
    }

    /// Use `reader` as the file source, replacing any previous one.
    #[must_use]
    pub fn with_file_reader(mut self, reader: impl Reader<T> + 'static) -> Self {
        self.file = Some(Box::new(reader));
        self
    }

    /// Use `reader` as the environment source, replacing any previous one.
    #[must_use]
    pub fn with_env_reader(mut self, reader: impl Reader<T> + 'static) -> Self {
        self.env = Some(Box::new(reader));
        self
    }

    /// Use `reader` as the secret-store source, replacing any previous one.
    #[must_use]
    pub fn with_secret_reader(mut self, reader: impl Reader<T> + 'static) -> Self {
        self.secrets = Some(Box::new(reader));
        self
    }

    /// Sources that will be applied, in application order.
    #[must_use]
    pub fn configured_sources(&self) -> Vec<SourceKind> {
        self.layers().map(|(origin, _)| origin).collect()
    }

    /// Apply every source to a copy of `target`, replacing `target` only when
    /// all of them succeed.
    ///
    /// # Errors
    ///
    /// Returns the same error as [`Reader::read`]; `target` is left unchanged.
    pub fn read_atomic(&self, target: &mut T) -> TunerResult<()>
    where
        T: Clone,
    {
        let mut staged = target.clone();
        self.read(&mut staged)?;
        *target = staged;
        Ok(())
    }

    fn slots(&self) -> [(SourceKind, Option<&(dyn Reader<T> + 'static)>); 3] {
        [
            (SourceKind::File, self.file.as_deref()),
            (SourceKind::Environment, self.env.as_deref()),
            (SourceKind::SecretStore, self.secrets.as_deref()),
        ]
    }

    fn layers(&self) -> impl Iterator<Item = (SourceKind, &(dyn Reader<T> + 'static))> {
        self.slots()
            .into_iter()
            .filter_map(|(origin, slot)| slot.map(|reader| (origin, reader)))
    }
}

impl<T> Tuner<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Read the YAML or JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TunerError::Configuration`] when `path` is empty.
    pub fn from_file(self, path: impl Into<std::path::PathBuf>) -> TunerResult<Self> {
        Ok(self.with_file_reader(FileReader::new(path)?))
    }

    /// Read every environment variable.
    #[must_use]
    pub fn from_env(self) -> Self {
        self.with_env_reader(EnvReader::new())
    }

    /// Read environment variables starting with `prefix`.
    #[must_use]
    pub fn from_env_prefixed(self, prefix: impl Into<String>) -> Self {
        self.with_env_reader(EnvReader::prefixed(prefix))
    }
}

impl<T> Tuner<T>
where
    T: SecretFields,
{
    /// Read secrets from `path` through `client`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SecretReader::new`].
    pub fn from_secret_client<C>(self, client: C, path: impl Into<String>) -> TunerResult<Self>
    where
        C: SecretClient + 'static,
    {
        Ok(self.with_secret_reader(SecretReader::new(client, path)?))
    }

    /// Read secrets from the Vault server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SecretReader::from_config`].
    #[cfg(feature = "vault-http")]
    pub fn from_vault(self, config: &VaultConfig) -> TunerResult<Self> {
        Ok(self.with_secret_reader(SecretReader::from_config(config)?))
    }
}

impl<T> Default for Tuner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Tuner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tuner")
            .field("sources", &self.configured_sources())
            .finish()
    }
}

impl<T> Reader<T> for Tuner<T> {
    fn read(&self, target: &mut T) -> TunerResult<()> {
        for (origin, slot) in self.slots() {
            let Some(reader) = slot else {
                debug!(%origin, "configuration source not configured; skipping");
                continue;
            };
            debug!(%origin, "applying configuration source");
            reader.read(target).within_source(origin)?;
        }
        Ok(())
    }
}
