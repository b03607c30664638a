//! File reader coverage for both decoders and the extension policy.

use super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde::Deserialize;
use test_helpers::figment::with_jail;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
struct Settings {
    name: String,
    port: i32,
    debug: bool,
    greeting: String,
}

fn read_file(path: &str, target: &mut Settings) -> TunerResult<()> {
    FileReader::new(path)?.read(target)
}

#[rstest]
#[case("settings.yaml", "name: svc-a\nport: 8080\ndebug: true\ngreeting: hello\n")]
#[case(
    "settings.json",
    r#"{"name": "svc-a", "port": 8080, "debug": true, "greeting": "hello"}"#
)]
fn decodes_supported_formats(#[case] file: &str, #[case] contents: &str) -> Result<()> {
    with_jail(|jail| {
        jail.create_file(file, contents)?;
        let mut settings = Settings::default();
        read_file(file, &mut settings)?;
        ensure!(
            settings
                == Settings {
                    name: "svc-a".to_owned(),
                    port: 8080,
                    debug: true,
                    greeting: "hello".to_owned(),
                },
            "unexpected settings {settings:?}"
        );
        Ok(())
    })
}

#[rstest]
fn keys_missing_from_the_file_keep_current_values() -> Result<()> {
    with_jail(|jail| {
        jail.create_file("settings.json", r#"{"port": 9090}"#)?;
        let mut settings = Settings {
            name: "seed".to_owned(),
            ..Settings::default()
        };
        read_file("settings.json", &mut settings)?;
        ensure!(settings.port == 9090, "port should come from the file");
        ensure!(settings.name == "seed", "name should be preserved");
        Ok(())
    })
}

#[rstest]
fn yaml_yes_remains_a_string() -> Result<()> {
    with_jail(|jail| {
        jail.create_file("settings.yaml", "greeting: yes")?;
        let mut settings = Settings::default();
        read_file("settings.yaml", &mut settings)?;
        ensure!(settings.greeting == "yes", "expected string literal \"yes\"");
        Ok(())
    })
}

#[rstest]
fn empty_yaml_file_is_a_no_op() -> Result<()> {
    with_jail(|jail| {
        jail.create_file("settings.yaml", "")?;
        let mut settings = Settings {
            port: 7,
            ..Settings::default()
        };
        read_file("settings.yaml", &mut settings)?;
        ensure!(settings.port == 7, "empty file should not change the record");
        Ok(())
    })
}

#[rstest]
#[case(".yaml", "port: 7070\n")]
#[case("conf.d/.json", r#"{"port": 7070}"#)]
fn dotfiles_are_decoded_by_their_suffix(#[case] file: &str, #[case] contents: &str) -> Result<()> {
    with_jail(|jail| {
        std::fs::create_dir_all("conf.d")?;
        jail.create_file(file, contents)?;
        let mut settings = Settings::default();
        read_file(file, &mut settings)?;
        ensure!(settings.port == 7070, "unexpected settings {settings:?}");
        Ok(())
    })
}

#[rstest]
#[case("settings.toml", "toml")]
#[case("settings.yml", "yml")]
#[case("settings.YAML", "YAML")]
#[case("settings", "")]
fn unrecognised_extensions_are_rejected(#[case] file: &str, #[case] expected: &str) -> Result<()> {
    with_jail(|jail| {
        jail.create_file(file, "port = 1")?;
        let err = read_file(file, &mut Settings::default())
            .err()
            .ok_or_else(|| anyhow!("expected {file} to be rejected"))?;
        ensure!(
            matches!(&err, TunerError::UnsupportedExtension { extension, .. } if extension == expected),
            "unexpected error: {err:?}"
        );
        Ok(())
    })
}

#[rstest]
#[case("settings.json", r#"{"port": "#)]
#[case("settings.json", r#"{"port": "not-a-number"}"#)]
#[case("settings.yaml", "port: [")]
fn decode_failures_keep_the_decoder_error(#[case] file: &str, #[case] contents: &str) -> Result<()> {
    with_jail(|jail| {
        jail.create_file(file, contents)?;
        let mut settings = Settings::default();
        let err = read_file(file, &mut settings)
            .err()
            .ok_or_else(|| anyhow!("expected decoding to fail"))?;
        ensure!(
            matches!(err, TunerError::Decode { .. }),
            "unexpected error: {err:?}"
        );
        ensure!(
            std::error::Error::source(&err).is_some(),
            "decode error should expose its cause"
        );
        ensure!(settings == Settings::default(), "record changed on failure");
        Ok(())
    })
}

#[rstest]
fn missing_file_reports_the_path() -> Result<()> {
    with_jail(|_| {
        let err = read_file("absent.yaml", &mut Settings::default())
            .err()
            .ok_or_else(|| anyhow!("expected missing file to fail"))?;
        ensure!(
            matches!(err, TunerError::Io { .. }),
            "unexpected error: {err:?}"
        );
        ensure!(
            err.to_string() == "failed to read file with path=absent.yaml",
            "unexpected message: {err}"
        );
        Ok(())
    })
}

#[rstest]
fn empty_path_is_a_configuration_error() {
    let err = FileReader::new("").err();
    assert!(
        matches!(
            err,
            Some(TunerError::Configuration {
                origin: SourceKind::File,
                ..
            })
        ),
        "unexpected result: {err:?}"
    );
}
