//! YAML decoding through `serde-saphyr`, exposed as a Figment provider.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::error::Kind;
use figment::value::{Dict, Value};
use figment::{Metadata, Profile, Provider};
use serde_saphyr::Options;

/// Figment provider holding the YAML text of one configuration file.
///
/// Booleans follow YAML 1.2: only `true` and `false` are booleans, so values
/// such as `yes` or `on` stay strings.
#[derive(Clone, Debug)]
pub struct SaphyrYaml {
    path: PathBuf,
    contents: String,
}

impl SaphyrYaml {
    /// Wrap `contents` read from `path`; the path is only used in diagnostics.
    #[must_use]
    pub fn string<P, S>(path: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    fn parse(&self) -> Result<Value, figment::Error> {
        let options = Options {
            strict_booleans: true,
            ..Options::default()
        };
        serde_saphyr::from_str_with_options(&self.contents, options).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.path.display()
            )))
        })
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("YAML file", self.path.as_path())
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        if self.contents.trim().is_empty() {
            return Ok(Profile::Default.collect(Dict::new()));
        }
        let value = self.parse()?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
