//! Connection parameters for a Vault secret store.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::coerce::NumericMode;
use crate::reader::SourceKind;
use crate::{TunerError, TunerResult};

/// Address used when neither the configuration nor `VAULT_ADDR` names one.
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";

const ADDRESS_ENV: &str = "VAULT_ADDR";

/// Layout of the key/value engine mounted at the secret path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvVersion {
    /// Secrets are returned directly under `data`.
    #[default]
    V1,
    /// Secrets are nested under `data.data`, beside version metadata.
    V2,
}

/// Parameters used to read secrets from Vault into a record.
///
/// The configuration can itself be loaded from a file:
///
/// ```
/// use tuner::{KvVersion, VaultConfig};
///
/// let config: VaultConfig = serde_json::from_str(
///     r#"{ "path": "secret/data/app", "token": "s.abc", "kv_version": "v2", "timeout": 5 }"#,
/// )?;
/// assert_eq!(config.kv_version, KvVersion::V2);
/// assert_eq!(config.timeout, Some(std::time::Duration::from_secs(5)));
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct VaultConfig {
    /// Base address of the Vault server; see [`VaultConfig::resolved_address`].
    #[serde(default)]
    pub address: Option<String>,
    /// Request timeout, given in whole seconds when deserialised.
    #[serde(default, deserialize_with = "deserialize_timeout")]
    pub timeout: Option<Duration>,
    /// Path of the secret to read, such as `secret/app`.
    pub path: String,
    /// Token sent with every request.
    #[serde(deserialize_with = "deserialize_token")]
    pub token: SecretString,
    /// Layout of the key/value engine.
    #[serde(default)]
    pub kv_version: KvVersion,
    /// How numbers are checked against field widths.
    #[serde(default)]
    pub numeric_mode: NumericMode,
    /// TLS material for the connection.
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl VaultConfig {
    /// Create a configuration for `path` authenticated by `token`.
    #[must_use]
    pub fn new(path: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: None,
            timeout: None,
            path: path.into(),
            token: SecretString::from(token.into()),
            kv_version: KvVersion::default(),
            numeric_mode: NumericMode::default(),
            tls: None,
        }
    }

    /// Set the server address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Select the key/value engine layout.
    #[must_use]
    pub fn with_kv_version(mut self, version: KvVersion) -> Self {
        self.kv_version = version;
        self
    }

    /// Select how numbers are checked against field widths.
    #[must_use]
    pub fn with_numeric_mode(mut self, mode: NumericMode) -> Self {
        self.numeric_mode = mode;
        self
    }

    /// Attach TLS material.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Check that the token and the secret path are present.
    ///
    /// # Errors
    ///
    /// Returns [`TunerError::Configuration`] naming the missing parameter.
    pub fn validate(&self) -> TunerResult<()> {
        if self.token.expose_secret().is_empty() {
            return Err(TunerError::configuration(
                SourceKind::SecretStore,
                "vault token must not be empty",
            ));
        }
        if self.path.is_empty() {
            return Err(TunerError::configuration(
                SourceKind::SecretStore,
                "vault path to secrets must not be empty",
            ));
        }
        Ok(())
    }

    /// Server address: the configured one, else `VAULT_ADDR`, else
    /// [`DEFAULT_ADDRESS`].
    #[must_use]
    pub fn resolved_address(&self) -> String {
        self.address
            .clone()
            .or_else(|| std::env::var(ADDRESS_ENV).ok())
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned())
    }
}

/// TLS material used to reach Vault.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// PEM file holding a CA certificate to trust.
    pub ca_cert: Option<PathBuf>,
    /// Directory of PEM CA certificates to trust.
    pub ca_path: Option<PathBuf>,
    /// PEM client certificate; requires [`TlsConfig::client_key`].
    pub client_cert: Option<PathBuf>,
    /// PEM private key for [`TlsConfig::client_cert`].
    pub client_key: Option<PathBuf>,
    /// Server name expected in the certificate. Not supported by the HTTP
    /// client; a warning is logged when set.
    pub tls_server_name: Option<String>,
    /// Skip certificate verification.
    pub insecure: bool,
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(|secs| secs.map(Duration::from_secs))
}
