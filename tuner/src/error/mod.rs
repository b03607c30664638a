//! Error types produced while reading configuration sources.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::coerce::CoerceError;
use crate::reader::SourceKind;

/// Boxed error used for causes that come from transport libraries.
pub type BoxedCause = Box<dyn StdError + Send + Sync>;

/// Errors that can occur while filling a configuration record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TunerError {
    /// Caller-supplied source parameters are unusable.
    #[error("invalid {origin} configuration: {message}")]
    Configuration {
        /// Source whose parameters were rejected.
        origin: SourceKind,
        /// Human-readable explanation of the problem.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read file with path={}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file extension selects no known decoder.
    #[error("wrong extension '{extension}' for configuration file '{}'", path.display())]
    UnsupportedExtension {
        /// Path of the configuration file.
        path: PathBuf,
        /// Trailing extension that was not recognised.
        extension: String,
    },

    /// The configuration file contents could not be decoded into the record.
    #[error("failed to decode configuration file '{}': {source}", path.display())]
    Decode {
        /// Path of the configuration file.
        path: PathBuf,
        /// Error reported by the decoder.
        #[source]
        source: Box<figment::Error>,
    },

    /// Environment variables could not be decoded into the record.
    #[error("failed to decode environment variables: {0}")]
    Environment(#[source] Box<figment::Error>),

    /// The secret store rejected a request or could not be reached.
    #[error("secret store request failed: {0}")]
    Remote(#[from] RemoteError),

    /// A secret value could not be written into its tagged field.
    #[error("failed to set '{tag}' target field: {source}")]
    Bind {
        /// Binding tag of the failing field.
        tag: &'static str,
        /// Coercion failure for the field.
        #[source]
        source: CoerceError,
    },

    /// A configured source failed during composition.
    #[error("failed to read config from {origin}: {source}")]
    Source {
        /// Source that failed.
        origin: SourceKind,
        /// Failure reported by the source.
        #[source]
        source: Box<TunerError>,
    },
}

impl TunerError {
    /// Construct a [`TunerError::Configuration`] for `origin`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuner::{SourceKind, TunerError};
    ///
    /// let err = TunerError::configuration(SourceKind::File, "path must not be empty");
    /// assert_eq!(err.to_string(), "invalid file configuration: path must not be empty");
    /// ```
    #[must_use]
    pub fn configuration(origin: SourceKind, message: impl Into<String>) -> Self {
        Self::Configuration {
            origin,
            message: message.into(),
        }
    }

    /// Annotate the error with the source that produced it.
    #[must_use]
    pub fn in_source(self, origin: SourceKind) -> Self {
        Self::Source {
            origin,
            source: Box::new(self),
        }
    }

    /// Returns the source named by a composition failure, if any.
    #[must_use]
    pub const fn failed_source(&self) -> Option<SourceKind> {
        match self {
            Self::Source { origin, .. } | Self::Configuration { origin, .. } => Some(*origin),
            _ => None,
        }
    }

    /// Returns the error with composition context removed.
    #[must_use]
    pub fn innermost(&self) -> &Self {
        match self {
            Self::Source { source, .. } => source.innermost(),
            other => other,
        }
    }
}

/// Failures talking to the secret store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    /// The token was rejected by the self-lookup performed at construction.
    #[error("wrong auth token: {source}")]
    InvalidToken {
        /// Failure reported by the lookup request.
        #[source]
        source: Box<RemoteError>,
    },

    /// TLS material could not be loaded.
    #[error("failed to configure TLS: {message}")]
    Tls {
        /// Description of the rejected material.
        message: String,
        /// Underlying failure, when one is available.
        #[source]
        source: Option<BoxedCause>,
    },

    /// The request could not be sent or no response arrived.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: BoxedCause,
    },

    /// The store answered with a non-success status.
    #[error("{url} responded with status {status}: {message}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error messages returned by the store.
        message: String,
    },

    /// The response body was not the expected JSON document.
    #[error("failed to decode response from {url}: {source}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying decoding failure.
        #[source]
        source: BoxedCause,
    },
}

#[cfg(test)]
mod tests;
