//! Vault client over the HTTP API, using a blocking `reqwest` client.
//!
//! The client must not be used from inside an async runtime worker thread;
//! `reqwest::blocking` panics there.

use std::fs;
use std::path::Path;

use reqwest::StatusCode;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::{Certificate, Identity};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::TunerResult;
use crate::error::RemoteError;
use crate::value::{RawValue, SecretMap};

use super::SecretClient;
use super::config::{KvVersion, TlsConfig, VaultConfig};

const TOKEN_HEADER: &str = "X-Vault-Token";
const LOOKUP_SELF: &str = "auth/token/lookup-self";

/// [`SecretClient`] backed by the Vault HTTP API.
#[derive(Debug)]
pub struct VaultClient {
    http: Client,
    address: String,
    token: SecretString,
    kv_version: KvVersion,
}

#[derive(Deserialize)]
struct SecretResponse {
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

impl VaultClient {
    /// Build a client for the server described by `config`.
    ///
    /// No request is sent; the token is checked when the client is handed to
    /// [`super::SecretReader::new`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::TunerError::Configuration`] when the configuration is
    /// incomplete and [`crate::TunerError::Remote`] when the TLS material cannot
    /// be loaded.
    pub fn new(config: &VaultConfig) -> TunerResult<Self> {
        config.validate()?;
        let http = build_http(config)?;
        let address = config.resolved_address();
        debug!(%address, "created vault client");
        Ok(Self {
            http,
            address,
            token: config.token.clone(),
            kv_version: config.kv_version,
        })
    }

    /// Server address requests are sent to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.address.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn get(&self, path: &str) -> Result<Option<SecretResponse>, RemoteError> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.expose_secret())
            .send()
            .map_err(|err| RemoteError::Transport {
                url: url.clone(),
                source: Box::new(err),
            })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        response
            .json::<SecretResponse>()
            .map(Some)
            .map_err(|err| RemoteError::Body {
                url,
                source: Box::new(err),
            })
    }
}

impl SecretClient for VaultClient {
    fn lookup_self(&self) -> Result<(), RemoteError> {
        match self.get(LOOKUP_SELF)? {
            Some(_) => Ok(()),
            None => Err(RemoteError::Status {
                url: self.url(LOOKUP_SELF),
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "token lookup returned no data".to_owned(),
            }),
        }
    }

    fn read_secret(&self, path: &str) -> Result<Option<SecretMap>, RemoteError> {
        let Some(response) = self.get(path)? else {
            return Ok(None);
        };
        Ok(secret_data(response, self.kv_version).map(into_secret_map))
    }
}

fn secret_data(response: SecretResponse, version: KvVersion) -> Option<Map<String, Value>> {
    let data = response.data?;
    match version {
        KvVersion::V1 => Some(data),
        KvVersion::V2 => match data.get("data") {
            Some(Value::Object(inner)) => Some(inner.clone()),
            _ => None,
        },
    }
}

fn into_secret_map(data: Map<String, Value>) -> SecretMap {
    data.into_iter()
        .map(|(key, value)| (key, RawValue::from(value)))
        .collect()
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .filter(|parsed| !parsed.errors.is_empty())
        .map_or_else(|| body.trim().to_owned(), |parsed| parsed.errors.join("; "))
}

fn build_http(config: &VaultConfig) -> Result<Client, RemoteError> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(tls) = &config.tls {
        builder = configure_tls(builder, tls)?;
    }
    builder.build().map_err(|err| RemoteError::Tls {
        message: "failed to create vault client".to_owned(),
        source: Some(Box::new(err)),
    })
}

fn configure_tls(mut builder: ClientBuilder, tls: &TlsConfig) -> Result<ClientBuilder, RemoteError> {
    if let Some(path) = &tls.ca_cert {
        builder = builder.add_root_certificate(load_certificate(path)?);
    }
    if let Some(dir) = &tls.ca_path {
        for path in certificate_files(dir)? {
            builder = builder.add_root_certificate(load_certificate(&path)?);
        }
    }
    match (&tls.client_cert, &tls.client_key) {
        (Some(cert), Some(key)) => {
            let mut pem = read_pem(cert)?;
            pem.extend(read_pem(key)?);
            let identity = Identity::from_pem(&pem).map_err(|err| RemoteError::Tls {
                message: format!("invalid client certificate {}", cert.display()),
                source: Some(Box::new(err)),
            })?;
            builder = builder.identity(identity);
        }
        (None, None) => {}
        _ => {
            return Err(RemoteError::Tls {
                message: "client_cert and client_key must be set together".to_owned(),
                source: None,
            });
        }
    }
    if let Some(name) = &tls.tls_server_name {
        warn!(tls_server_name = %name, "server name override is not supported; ignoring");
    }
    if tls.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }
    Ok(builder)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, RemoteError> {
    fs::read(path).map_err(|err| RemoteError::Tls {
        message: format!("failed to read {}", path.display()),
        source: Some(Box::new(err)),
    })
}

fn load_certificate(path: &Path) -> Result<Certificate, RemoteError> {
    let pem = read_pem(path)?;
    Certificate::from_pem(&pem).map_err(|err| RemoteError::Tls {
        message: format!("invalid CA certificate {}", path.display()),
        source: Some(Box::new(err)),
    })
}

fn certificate_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, RemoteError> {
    let entries = fs::read_dir(dir).map_err(|err| RemoteError::Tls {
        message: format!("failed to read CA directory {}", dir.display()),
        source: Some(Box::new(err)),
    })?;
    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}
