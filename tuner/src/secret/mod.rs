//! Reading configuration records from a remote secret store.
//!
//! The store itself sits behind [`SecretClient`]; [`SecretReader`] fetches the
//! raw mapping for one path and hands it to the tag-driven binder. With the
//! `vault-http` feature, [`VaultClient`] talks to Vault over HTTP.

mod config;
#[cfg(feature = "vault-http")]
mod http;

use tracing::debug;

use crate::bind::{SecretFields, bind_with};
use crate::coerce::NumericMode;
use crate::error::RemoteError;
use crate::reader::{Reader, SourceKind};
use crate::value::SecretMap;
use crate::{TunerError, TunerResult};

pub use config::{DEFAULT_ADDRESS, KvVersion, TlsConfig, VaultConfig};
#[cfg(feature = "vault-http")]
pub use http::VaultClient;

/// Client for an authenticated key/value secret store.
pub trait SecretClient {
    /// Check that the configured credentials are accepted by the store.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] when the store rejects the credentials or
    /// cannot be reached.
    fn lookup_self(&self) -> Result<(), RemoteError>;

    /// Read the key/value pairs stored at `path`.
    ///
    /// Returns `Ok(None)` when nothing is stored at the path.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] when the request fails.
    fn read_secret(&self, path: &str) -> Result<Option<SecretMap>, RemoteError>;
}

impl<C> SecretClient for Box<C>
where
    C: SecretClient + ?Sized,
{
    fn lookup_self(&self) -> Result<(), RemoteError> {
        (**self).lookup_self()
    }

    fn read_secret(&self, path: &str) -> Result<Option<SecretMap>, RemoteError> {
        (**self).read_secret(path)
    }
}

/// Binds the secrets stored at one path onto tagged record fields.
#[derive(Debug)]
pub struct SecretReader<C> {
    client: C,
    path: String,
    mode: NumericMode,
}

impl<C: SecretClient> SecretReader<C> {
    /// Create a reader for `path`, validating the client's credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TunerError::Configuration`] when `path` is empty, and
    /// [`TunerError::Remote`] when the credential lookup fails. A lookup the
    /// store answered with an error status becomes
    /// [`RemoteError::InvalidToken`]; other failures are passed through.
    pub fn new(client: C, path: impl Into<String>) -> TunerResult<Self> {
        let secret_path = path.into();
        if secret_path.is_empty() {
            return Err(TunerError::configuration(
                SourceKind::SecretStore,
                "vault path to secrets must not be empty",
            ));
        }
        client.lookup_self().map_err(rejected_token)?;
        Ok(Self {
            client,
            path: secret_path,
            mode: NumericMode::default(),
        })
    }

    /// Select how numbers are checked against field widths.
    #[must_use]
    pub fn with_numeric_mode(mut self, mode: NumericMode) -> Self {
        self.mode = mode;
        self
    }

    /// Path whose secrets are read.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the raw mapping, treating a missing secret as empty.
    ///
    /// # Errors
    ///
    /// Returns [`TunerError::Remote`] when the store request fails.
    pub fn fetch(&self) -> TunerResult<SecretMap> {
        Ok(self.client.read_secret(&self.path)?.unwrap_or_default())
    }
}

fn rejected_token(err: RemoteError) -> RemoteError {
    match err {
        RemoteError::Status { .. } => RemoteError::InvalidToken {
            source: Box::new(err),
        },
        other => other,
    }
}

#[cfg(feature = "vault-http")]
impl SecretReader<VaultClient> {
    /// Connect to Vault as described by `config` and create a reader.
    ///
    /// # Errors
    ///
    /// Returns [`TunerError::Configuration`] for an empty token or path and
    /// [`TunerError::Remote`] for unusable TLS material or a rejected token.
    pub fn from_config(config: &VaultConfig) -> TunerResult<Self> {
        let client = VaultClient::new(config)?;
        Ok(Self::new(client, config.path.clone())?.with_numeric_mode(config.numeric_mode))
    }
}

impl<T, C> Reader<T> for SecretReader<C>
where
    T: SecretFields,
    C: SecretClient,
{
    fn read(&self, target: &mut T) -> TunerResult<()> {
        debug!(path = %self.path, "reading secrets");
        let secrets = self.fetch()?;
        if secrets.is_empty() {
            debug!(path = %self.path, "no secrets stored at path");
            return Ok(());
        }
        bind_with(target, &secrets, self.mode)
    }
}
