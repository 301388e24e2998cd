use std::error::Error;

use pedia::{ErrorCode, PediaError, Result, ToolEnvelope};

#[test]
fn test_error_display() {
    let err = PediaError::Api {
        status: 502,
        message: "bad gateway".into(),
    };
    assert_eq!(err.to_string(), "API error (502): bad gateway");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(PediaError::Http("connection reset".into()))
    }
    assert!(returns_error().is_err());
}

#[test]
fn exhaustion_names_attempts_and_cause() {
    let err = PediaError::UpstreamUnavailable {
        attempts: 3,
        last: Box::new(PediaError::Http("timed out".into())),
    };
    assert_eq!(
        err.to_string(),
        "upstream fetch error after 3 attempts: HTTP error: timed out"
    );

    let source = err.source().expect("cause is chained");
    assert_eq!(source.to_string(), "HTTP error: timed out");
}

#[test]
fn validation_classification() {
    assert!(PediaError::InvalidParameter("keyword is required".into()).is_validation());
    assert!(PediaError::MissingCredential("PEDIA_API_KEY is required".into()).is_validation());
    assert!(!PediaError::Http("x".into()).is_validation());
    assert!(!PediaError::Configuration("x".into()).is_validation());
}

#[test]
fn validation_errors_become_envelopes() {
    let envelope =
        ToolEnvelope::from_validation(PediaError::InvalidParameter("term is required".into()))
            .unwrap();
    let error = envelope.error().unwrap();
    assert_eq!(error.code, ErrorCode::InvalidParameter);
    assert_eq!(error.message, "term is required");
}

#[test]
fn other_errors_pass_through_envelope_conversion() {
    let result = ToolEnvelope::from_validation(PediaError::Http("reset".into()));
    assert!(matches!(result, Err(PediaError::Http(_))));
}

#[test]
fn json_errors_convert() {
    let err: PediaError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(err.to_string().starts_with("JSON error"));
}
