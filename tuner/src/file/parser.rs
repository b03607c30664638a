//! Decoder selection by file extension.

use std::path::Path;

use figment::Figment;
#[cfg(feature = "json")]
use figment::providers::{Format, Json};

use crate::{TunerError, TunerResult};

#[cfg(not(all(feature = "json", feature = "yaml")))]
use super::decode_error;
#[cfg(feature = "yaml")]
use super::yaml::SaphyrYaml;

const YAML_EXT: &str = "yaml";
const JSON_EXT: &str = "json";

/// Parse configuration data according to the file extension.
///
/// Exactly two extensions are recognised, compared case-sensitively: `yaml`
/// and `json`. The matching cargo feature must be enabled.
///
/// The extension is whatever follows the last `.` of the file name, so a
/// dotfile such as `.yaml` is read as YAML.
///
/// # Errors
///
/// Returns [`TunerError::UnsupportedExtension`] for any other extension, or
/// [`TunerError::Decode`] when the required feature is disabled.
pub(super) fn parse_config_by_format(path: &Path, data: &str) -> TunerResult<Figment> {
    match extension(path) {
        JSON_EXT => {
            #[cfg(feature = "json")]
            {
                Ok(Figment::from(Json::string(data)))
            }
            #[cfg(not(feature = "json"))]
            {
                let _ = data;
                Err(decode_error(
                    path,
                    "json feature disabled: enable the 'json' feature to support this file format",
                ))
            }
        }
        YAML_EXT => {
            #[cfg(feature = "yaml")]
            {
                Ok(Figment::from(SaphyrYaml::string(
                    path.to_path_buf(),
                    data.to_owned(),
                )))
            }
            #[cfg(not(feature = "yaml"))]
            {
                let _ = data;
                Err(decode_error(
                    path,
                    "yaml feature disabled: enable the 'yaml' feature to support this file format",
                ))
            }
        }
        other => Err(TunerError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: other.to_owned(),
        }),
    }
}

fn extension(path: &Path) -> &str {
    path.file_name()
        .and_then(std::ffi::OsStr::to_str)
        .and_then(|name| name.rsplit_once('.'))
        .map_or("", |(_, ext)| ext)
}
