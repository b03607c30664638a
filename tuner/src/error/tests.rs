//! Unit tests for error rendering and composition context.

use super::*;
use crate::value::FieldKind;
use rstest::rstest;

fn bind_failure() -> TunerError {
    TunerError::Bind {
        tag: "port",
        source: CoerceError::TypeMismatch {
            expected: FieldKind::Int { bits: 32 },
            found: "boolean",
        },
    }
}

#[rstest]
fn bind_errors_name_the_tag() {
    let message = bind_failure().to_string();
    assert!(
        message.starts_with("failed to set 'port' target field:"),
        "unexpected message: {message}"
    );
}

#[rstest]
#[case(SourceKind::File, "failed to read config from file:")]
#[case(SourceKind::Environment, "failed to read config from environment:")]
#[case(SourceKind::SecretStore, "failed to read config from vault:")]
fn source_context_names_the_origin(#[case] origin: SourceKind, #[case] prefix: &str) {
    let err = bind_failure().in_source(origin);
    assert!(err.to_string().starts_with(prefix), "unexpected message: {err}");
    assert_eq!(err.failed_source(), Some(origin));
}

#[rstest]
fn innermost_strips_every_layer_of_context() {
    let err = bind_failure()
        .in_source(SourceKind::SecretStore)
        .in_source(SourceKind::SecretStore);
    assert!(matches!(err.innermost(), TunerError::Bind { tag: "port", .. }));
}

#[rstest]
fn configuration_errors_report_their_origin() {
    let err = TunerError::configuration(SourceKind::SecretStore, "vault token must not be empty");
    assert_eq!(err.failed_source(), Some(SourceKind::SecretStore));
    assert_eq!(
        err.to_string(),
        "invalid vault configuration: vault token must not be empty"
    );
}

#[rstest]
fn plain_errors_have_no_failed_source() {
    assert_eq!(bind_failure().failed_source(), None);
}

#[rstest]
fn invalid_token_keeps_the_lookup_failure_as_source() {
    let err = TunerError::from(RemoteError::InvalidToken {
        source: Box::new(RemoteError::Status {
            url: "http://vault/v1/auth/token/lookup-self".to_owned(),
            status: 403,
            message: "permission denied".to_owned(),
        }),
    });
    let rendered = err.to_string();
    assert!(rendered.contains("wrong auth token"), "unexpected: {rendered}");
    assert!(rendered.contains("permission denied"), "unexpected: {rendered}");
    let cause = StdError::source(&err).map(ToString::to_string);
    assert!(
        cause.is_some_and(|text| text.starts_with("wrong auth token")),
        "remote error should be the source"
    );
}

#[rstest]
fn io_errors_render_the_path() {
    let err = TunerError::Io {
        path: PathBuf::from("settings.yaml"),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    assert_eq!(err.to_string(), "failed to read file with path=settings.yaml");
}
