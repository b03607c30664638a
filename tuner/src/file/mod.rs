//! Reading configuration records from YAML and JSON files.

mod parser;
#[cfg(feature = "yaml")]
mod yaml;

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::Serialized;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::reader::{Reader, SourceKind};
use crate::result_ext::FigmentResultExt;
use crate::{TunerError, TunerResult};

use parser::parse_config_by_format;
#[cfg(feature = "yaml")]
pub use yaml::SaphyrYaml;

/// Reads a configuration file over the current contents of a record.
///
/// The decoder is chosen by the trailing extension, which must be exactly
/// `yaml` or `json`. Keys missing from the file leave the matching fields
/// unchanged.
///
/// # Examples
///
/// ```rust,no_run
/// use serde::{Deserialize, Serialize};
/// use tuner::{FileReader, Reader};
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct Settings {
///     host: String,
///     port: u16,
/// }
///
/// let reader = FileReader::new("settings.yaml")?;
/// let mut settings = Settings::default();
/// reader.read(&mut settings)?;
/// # Ok::<_, tuner::TunerError>(())
/// ```
#[derive(Clone, Debug)]
pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    /// Create a reader for `path`.
    ///
    /// The file is not touched until [`Reader::read`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`TunerError::Configuration`] when `path` is empty.
    pub fn new(path: impl Into<PathBuf>) -> TunerResult<Self> {
        let file_path = path.into();
        if file_path.as_os_str().is_empty() {
            return Err(TunerError::configuration(
                SourceKind::File,
                "path must not be empty",
            ));
        }
        Ok(Self { path: file_path })
    }

    /// Path this reader loads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> TunerResult<Figment> {
        let data = std::fs::read_to_string(&self.path).map_err(|source| TunerError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_config_by_format(&self.path, &data)
    }
}

impl<T> Reader<T> for FileReader
where
    T: Serialize + DeserializeOwned,
{
    fn read(&self, target: &mut T) -> TunerResult<()> {
        debug!(path = %self.path.display(), "reading configuration file");
        let file = self.load()?;
        let decoded = Figment::from(Serialized::defaults(&*target))
            .merge(file)
            .extract::<T>()
            .into_decode(&self.path)?;
        *target = decoded;
        Ok(())
    }
}

#[cfg(not(all(feature = "json", feature = "yaml")))]
pub(crate) fn decode_error(path: &Path, message: &str) -> TunerError {
    TunerError::Decode {
        path: path.to_path_buf(),
        source: Box::new(figment::Error::from(message.to_owned())),
    }
}

#[cfg(test)]
mod tests;
