//! Status-aware decoding of complete responses.

use proptest::prelude::*;
use vidlink_core::{
    ActorRecord, ErrorCode, JsonDecoder, MediaRecord, ModelError, PinCodeInfo, RecordDecoder,
    TransportResponse,
};

const AVAILABLE: &str = include_str!("../fixtures/video_available.json");
const UPLOAD_QUOTA: &str = include_str!("../fixtures/error_upload_quota.json");
const PIN_CODE: &str = include_str!("../fixtures/pin_code.json");

#[test]
fn test_success_response_decodes_media() {
    let video: MediaRecord = JsonDecoder::new()
        .decode_response(TransportResponse::new(200), AVAILABLE.as_bytes())
        .expect("2xx decodes");

    assert_eq!(video.resource_key.as_deref(), Some("c7a3f1e0b2"));
}

#[test]
fn test_error_response_carries_record() {
    let result: Result<ActorRecord, ModelError> = JsonDecoder::new()
        .decode_response(TransportResponse::new(403), UPLOAD_QUOTA.as_bytes());

    let error = result.expect_err("403 is an API error");
    let record = error.api_record().expect("API record present");
    assert_eq!(record.error_code(), ErrorCode::UploadQuotaDailyExceeded);
    assert_eq!(record.effective_http_status(), Some(403));
    assert!(record.is_forbidden());
    assert_eq!(
        error.to_string(),
        "API error: You have reached your daily upload limit."
    );
}

#[test]
fn test_pin_code_fixture() {
    let info: PinCodeInfo = JsonDecoder::new()
        .decode_pin_code(PIN_CODE.as_bytes())
        .expect("fixture should decode");

    assert_eq!(info.user_code.as_deref(), Some("KQ7VWZ"));
    assert_eq!(info.expires_in().as_secs(), 900);
    assert_eq!(info.poll_interval().as_secs(), 5);
}

#[test]
fn test_truncated_payload_is_decode_error() {
    let truncated = &AVAILABLE.as_bytes()[..AVAILABLE.len() / 2];
    let result = JsonDecoder::new().decode_media(truncated);

    assert!(matches!(result, Err(ModelError::Decode(_))));
}

proptest! {
    #[test]
    fn non_success_status_never_decodes(status in 300u16..600) {
        let result: Result<MediaRecord, ModelError> = JsonDecoder::new()
            .decode_response(TransportResponse::new(status), AVAILABLE.as_bytes());

        let error = result.expect_err("non-2xx is an API error");
        let record = error.api_record().expect("API record present");
        prop_assert_eq!(record.effective_http_status(), Some(status));
    }
}
