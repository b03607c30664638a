//! The common contract shared by every configuration source.

use std::fmt;

use crate::TunerResult;

/// Origin of configuration data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum SourceKind {
    /// A YAML or JSON configuration file.
    File,
    /// Process environment variables.
    Environment,
    /// A remote secret store such as Vault.
    SecretStore,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Environment => "environment",
            Self::SecretStore => "vault",
        })
    }
}

/// Fills a target record from one origin, using its own prior configuration.
///
/// Readers mutate the record in place: values the source does not provide are
/// left as they were, so several readers can be layered over one record.
///
/// # Examples
///
/// ```
/// use tuner::{Reader, TunerResult};
///
/// struct Fixed(u16);
///
/// struct Settings {
///     port: u16,
/// }
///
/// impl Reader<Settings> for Fixed {
///     fn read(&self, target: &mut Settings) -> TunerResult<()> {
///         target.port = self.0;
///         Ok(())
///     }
/// }
///
/// let mut settings = Settings { port: 0 };
/// Fixed(8080).read(&mut settings)?;
/// assert_eq!(settings.port, 8080);
/// # Ok::<_, tuner::TunerError>(())
/// ```
pub trait Reader<T> {
    /// Populate `target` from this source.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::TunerError`] describing why the source could not be
    /// applied. Fields written before the failure keep their new values.
    fn read(&self, target: &mut T) -> TunerResult<()>;
}

impl<T, R> Reader<T> for Box<R>
where
    R: Reader<T> + ?Sized,
{
    fn read(&self, target: &mut T) -> TunerResult<()> {
        (**self).read(target)
    }
}
