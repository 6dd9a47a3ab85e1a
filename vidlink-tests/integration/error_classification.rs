//! Error records built from recorded bodies plus transport context.

use vidlink_core::api_error::{AUTHENTICATION_HEADER, AUTHENTICATION_TOKEN_ERROR};
use vidlink_core::{
    ErrorBody, ErrorCode, ErrorRecord, JsonDecoder, ModelError, RecordDecoder, TransportResponse,
};

const PASSWORD_REQUIRED: &str = include_str!("../fixtures/error_password_required.json");
const UPLOAD_QUOTA: &str = include_str!("../fixtures/error_upload_quota.json");
const UNKNOWN_CODE: &str = include_str!("../fixtures/error_unknown_code.json");

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Transport(&'static str);

fn body(fixture: &str) -> ErrorBody {
    JsonDecoder::new()
        .decode_error_body(fixture.as_bytes())
        .expect("fixture should decode")
}

#[test]
fn test_password_required_body() {
    let record = ErrorRecord::builder()
        .body(body(PASSWORD_REQUIRED))
        .response(TransportResponse::new(403))
        .build();

    assert!(record.is_password_required());
    assert!(record.is_forbidden());
    assert!(!record.is_network_error());
    assert_eq!(record.error_code(), ErrorCode::InvalidInputVideoNoPassword);
    assert_eq!(
        record.invalid_parameter_error_code(),
        Some(ErrorCode::InvalidInputVideoNoPassword)
    );
    assert_eq!(
        record.log_string(),
        "The video requires a password, supply one with the password parameter."
    );
}

#[test]
fn test_upload_quota_code_reaches_log_string_only_without_message() {
    let record = ErrorRecord::from(body(UPLOAD_QUOTA));

    assert_eq!(record.error_code(), ErrorCode::UploadQuotaDailyExceeded);
    assert_eq!(record.log_string(), "You have reached your daily upload limit.");
    assert!(!record.is_password_required());
}

#[test]
fn test_unknown_code_falls_through_to_status() {
    let record = ErrorRecord::builder()
        .body(body(UNKNOWN_CODE))
        .response(TransportResponse::new(500))
        .build();

    assert_eq!(record.error_code(), ErrorCode::Default);
    assert_eq!(record.log_string(), "HTTP Status Code: 500");
    assert_eq!(ErrorRecord::from(body(UNKNOWN_CODE)).log_string(), "");
}

#[test]
fn test_invalid_token_challenge() {
    let record = ErrorRecord::builder()
        .response(
            TransportResponse::new(401).with_header(AUTHENTICATION_HEADER, AUTHENTICATION_TOKEN_ERROR),
        )
        .build();

    assert!(record.is_invalid_token());
    assert!(!ModelError::from(record).is_retryable());
}

#[test]
fn test_transport_failure_is_retryable() {
    let record = ErrorRecord::builder()
        .cause(Transport("connection reset by peer"))
        .fallback_status(0)
        .build();

    assert!(record.is_network_error());
    assert_eq!(record.effective_http_status(), Some(0));
    assert_eq!(record.log_string(), "Exception: connection reset by peer");
    assert!(ModelError::from(record).is_retryable());
}

#[test]
fn test_cancelled_call_is_not_a_network_error() {
    let record = ErrorRecord::builder()
        .cause(Transport("cancelled"))
        .cancelled(true)
        .build();

    assert!(record.is_cancelled());
    assert!(!record.is_network_error());
    assert!(!ModelError::from(record).is_retryable());
}

#[test]
fn test_service_unavailable_is_retryable() {
    let record = ErrorRecord::builder()
        .response(TransportResponse::new(503))
        .build();

    assert!(record.is_service_unavailable());
    assert!(ModelError::from(record).is_retryable());
}
