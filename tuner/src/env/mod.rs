//! Reading configuration records from process environment variables.

mod provider;

use figment::Figment;
use figment::providers::{Env, Serialized};
use figment::value::Value;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::TunerResult;
use crate::reader::Reader;
use crate::result_ext::FigmentResultExt;

use provider::FieldEnv;

/// Overlays environment variables on the current contents of a record.
///
/// Variable names are matched to serde field names case-insensitively. With a
/// prefix only variables starting with it are considered and the prefix is
/// stripped before matching; without one every variable in the process
/// environment is a candidate. A variable naming a field that currently holds a
/// string is taken verbatim, so `NAME=12345` binds to a `String` field. Other
/// values are parsed by Figment, so `8080` binds to an integer field and
/// `true` to a boolean one.
///
/// # Examples
///
/// ```rust,no_run
/// use serde::{Deserialize, Serialize};
/// use tuner::{EnvReader, Reader};
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct Settings {
///     port: u16,
/// }
///
/// // Reads APP_PORT.
/// let mut settings = Settings::default();
/// EnvReader::prefixed("APP_").read(&mut settings)?;
/// # Ok::<_, tuner::TunerError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct EnvReader {
    prefix: Option<String>,
}

impl EnvReader {
    /// Create a reader that considers every environment variable.
    #[must_use]
    pub const fn new() -> Self {
        Self { prefix: None }
    }

    /// Create a reader restricted to variables starting with `prefix`.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Prefix applied to variable names, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn provider(&self) -> Env {
        self.prefix
            .as_deref()
            .map_or_else(Env::raw, Env::prefixed)
    }
}

impl<T> Reader<T> for EnvReader
where
    T: Serialize + DeserializeOwned,
{
    fn read(&self, target: &mut T) -> TunerResult<()> {
        debug!(prefix = ?self.prefix(), "reading environment variables");
        let current = Value::serialize(&*target).into_environment()?;
        let decoded = Figment::from(Serialized::defaults(&*target))
            .merge(FieldEnv::new(self.provider(), current))
            .extract::<T>()
            .into_environment()?;
        *target = decoded;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
