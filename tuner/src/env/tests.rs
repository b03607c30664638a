//! Environment reader coverage.

use super::*;
use crate::TunerError;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde::Deserialize;
use test_helpers::figment::with_jail;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
struct Settings {
    name: String,
    port: i32,
    debug: bool,
}

#[rstest]
fn prefixed_variables_override_matching_fields() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.set_env("APP_PORT", "9090");
        jail.set_env("APP_DEBUG", "true");
        jail.set_env("NAME", "unprefixed");
        let mut settings = Settings {
            name: "seed".to_owned(),
            ..Settings::default()
        };
        EnvReader::prefixed("APP_").read(&mut settings)?;
        ensure!(settings.port == 9090, "port should come from APP_PORT");
        ensure!(settings.debug, "debug should come from APP_DEBUG");
        ensure!(settings.name == "seed", "unprefixed NAME must be ignored");
        Ok(())
    })
}

#[rstest]
fn unprefixed_reader_matches_field_names() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.set_env("NAME", "svc-env");
        let mut settings = Settings::default();
        EnvReader::new().read(&mut settings)?;
        ensure!(settings.name == "svc-env", "unexpected name {}", settings.name);
        Ok(())
    })
}

#[rstest]
fn empty_environment_leaves_the_record_unchanged() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        let seeded = Settings {
            name: "seed".to_owned(),
            port: 1,
            debug: true,
        };
        let mut settings = seeded.clone();
        EnvReader::prefixed("APP_").read(&mut settings)?;
        ensure!(settings == seeded, "record changed without variables");
        Ok(())
    })
}

#[rstest]
fn malformed_values_are_environment_errors() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.set_env("APP_PORT", "not-a-number");
        let mut settings = Settings::default();
        let err = EnvReader::prefixed("APP_")
            .read(&mut settings)
            .err()
            .ok_or_else(|| anyhow!("expected APP_PORT to be rejected"))?;
        ensure!(
            matches!(err, TunerError::Environment(_)),
            "unexpected error: {err:?}"
        );
        ensure!(settings == Settings::default(), "record changed on failure");
        Ok(())
    })
}

#[rstest]
#[case("12345")]
#[case("007")]
#[case("true")]
#[case("1.5")]
fn string_fields_take_the_raw_text(#[case] raw: &str) -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.set_env("APP_NAME", raw);
        jail.set_env("APP_PORT", "8080");
        let mut settings = Settings::default();
        EnvReader::prefixed("APP_").read(&mut settings)?;
        ensure!(settings.name == raw, "unexpected name {}", settings.name);
        ensure!(settings.port == 8080, "non-string fields are still parsed");
        Ok(())
    })
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Renamed {
    api_key: String,
}

#[rstest]
fn variables_match_renamed_fields_regardless_of_case() -> Result<()> {
    with_jail(|jail| {
        jail.clear_env();
        jail.set_env("APP_APIKEY", "42");
        let mut renamed = Renamed::default();
        EnvReader::prefixed("APP_").read(&mut renamed)?;
        ensure!(renamed.api_key == "42", "unexpected key {}", renamed.api_key);
        Ok(())
    })
}
