//! Seam between raw payloads and typed records.
//!
//! Transport lives outside this crate. Whatever fetched the bytes hands them
//! to a [`RecordDecoder`]; the resolvers only ever see the decoded records.

use serde::de::DeserializeOwned;

use crate::actor::ActorRecord;
use crate::api_error::{ErrorBody, ErrorRecord, TransportResponse};
use crate::errors::ModelError;
use crate::media::MediaRecord;
use crate::pin_code::PinCodeInfo;

/// Turns payload bytes into records.
///
/// Implementations cover different encodings; the JSON one is
/// [`JsonDecoder`].
pub trait RecordDecoder: Send + Sync + std::fmt::Debug {
    /// Decodes a media payload.
    ///
    /// # Errors
    ///
    /// - `ModelError::Decode` - The payload is not a media record
    fn decode_media(&self, payload: &[u8]) -> Result<MediaRecord, ModelError>;

    /// Decodes an actor payload.
    ///
    /// # Errors
    ///
    /// - `ModelError::Decode` - The payload is not an actor record
    fn decode_actor(&self, payload: &[u8]) -> Result<ActorRecord, ModelError>;

    /// Decodes an error body.
    ///
    /// # Errors
    ///
    /// - `ModelError::Decode` - The payload is not an error body
    fn decode_error_body(&self, payload: &[u8]) -> Result<ErrorBody, ModelError>;

    /// Decodes a pin-code authorization payload.
    ///
    /// # Errors
    ///
    /// - `ModelError::Decode` - The payload is not pin-code info
    fn decode_pin_code(&self, payload: &[u8]) -> Result<PinCodeInfo, ModelError>;
}

/// Decoder for the API's JSON encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes any record type.
    ///
    /// # Errors
    ///
    /// - `ModelError::Decode` - The payload is not valid JSON for `T`
    pub fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, ModelError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Decodes the body of a completed call.
    ///
    /// Success statuses decode into `T`. Anything else becomes an
    /// [`ErrorRecord`] carrying the response; a body that does not parse as
    /// an error is dropped so classification still works from the status.
    ///
    /// # Errors
    ///
    /// - `ModelError::Api` - The response status was not 2xx
    /// - `ModelError::Decode` - A 2xx body is not valid JSON for `T`
    pub fn decode_response<T: DeserializeOwned>(
        &self,
        response: TransportResponse,
        payload: &[u8],
    ) -> Result<T, ModelError> {
        if response.is_success() {
            return self.decode(payload);
        }

        let body = self.decode_error_body(payload).unwrap_or_else(|e| {
            tracing::debug!(status = response.status, error = %e, "Unparseable error body");
            ErrorBody::default()
        });
        let record = ErrorRecord::builder().body(body).response(response).build();
        tracing::debug!(
            status = ?record.effective_http_status(),
            message = %record.log_string(),
            "API call failed"
        );
        Err(ModelError::from(record))
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode_media(&self, payload: &[u8]) -> Result<MediaRecord, ModelError> {
        self.decode(payload)
    }

    fn decode_actor(&self, payload: &[u8]) -> Result<ActorRecord, ModelError> {
        self.decode(payload)
    }

    fn decode_error_body(&self, payload: &[u8]) -> Result<ErrorBody, ModelError> {
        self.decode(payload)
    }

    fn decode_pin_code(&self, payload: &[u8]) -> Result<PinCodeInfo, ModelError> {
        self.decode(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_error::AUTHENTICATION_TOKEN_ERROR;
    use crate::media::MediaStatus;

    #[test]
    fn test_success_decodes_record() {
        let media: MediaRecord = JsonDecoder::new()
            .decode_response(
                TransportResponse::new(200),
                br#"{"resource_key":"abc","status":"available"}"#,
            )
            .unwrap();

        assert_eq!(media.status(), MediaStatus::Available);
    }

    #[test]
    fn test_failure_becomes_api_error() {
        let response = TransportResponse::new(401)
            .with_header("WWW-Authenticate", AUTHENTICATION_TOKEN_ERROR);
        let result: Result<MediaRecord, _> = JsonDecoder::new().decode_response(
            response,
            br#"{"error":"You must provide a valid authenticated access token.","error_code":8003}"#,
        );

        let error = result.unwrap_err();
        let record = error.api_record().unwrap();
        assert!(record.is_invalid_token());
        assert_eq!(
            record.log_string(),
            "You must provide a valid authenticated access token."
        );
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_unparseable_error_body_keeps_status() {
        let result: Result<ActorRecord, _> = JsonDecoder::new()
            .decode_response(TransportResponse::new(502), b"<html>Bad Gateway</html>");

        let error = result.unwrap_err();
        assert_eq!(error.to_string(), "API error: HTTP Status Code: 502");
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        let result = JsonDecoder::new().decode_media(b"[1, 2, 3]");
        assert!(matches!(result, Err(ModelError::Decode(_))));
    }
}
