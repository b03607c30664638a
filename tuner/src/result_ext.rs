//! Extensions for mapping errors to `TunerResult` concisely.
//!
//! - Use [`TunerResultExt::within_source`] to record which configured source
//!   produced a failure.
//! - Use [`FigmentResultExt`] to turn `figment::Error` values from the file and
//!   environment readers into the matching [`TunerError`] variant.
//!
//! # Examples
//!
//! ```
//! use tuner::{SourceKind, TunerError, TunerResult, TunerResultExt};
//!
//! fn load() -> TunerResult<()> {
//!     Err(TunerError::configuration(SourceKind::File, "path must not be empty"))
//! }
//!
//! let err = load().within_source(SourceKind::File).unwrap_err();
//! assert_eq!(err.failed_source(), Some(SourceKind::File));
//! ```

use std::path::Path;

use crate::reader::SourceKind;
use crate::{TunerError, TunerResult};

/// Attach composition context to a failed read.
pub trait TunerResultExt<T> {
    /// Wrap the error in [`TunerError::Source`] naming `origin`.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `origin` when the input is `Err`.
    fn within_source(self, origin: SourceKind) -> TunerResult<T>;
}

impl<T> TunerResultExt<T> for TunerResult<T> {
    fn within_source(self, origin: SourceKind) -> TunerResult<T> {
        self.map_err(|err| err.in_source(origin))
    }
}

/// Map `figment::Error` results into reader failures.
pub trait FigmentResultExt<T> {
    /// Convert into [`TunerError::Decode`] for the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `TunerError::Decode` when the input is `Err`.
    fn into_decode(self, path: &Path) -> TunerResult<T>;

    /// Convert into [`TunerError::Environment`].
    ///
    /// # Errors
    ///
    /// Returns a `TunerError::Environment` when the input is `Err`.
    fn into_environment(self) -> TunerResult<T>;
}

impl<T> FigmentResultExt<T> for Result<T, figment::Error> {
    fn into_decode(self, path: &Path) -> TunerResult<T> {
        self.map_err(|err| TunerError::Decode {
            path: path.to_path_buf(),
            source: Box::new(err),
        })
    }

    fn into_environment(self) -> TunerResult<T> {
        self.map_err(|err| TunerError::Environment(Box::new(err)))
    }
}
