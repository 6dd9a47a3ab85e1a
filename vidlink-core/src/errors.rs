//! Error types for decoding and surfacing API failures.

use thiserror::Error;

use crate::api_error::ErrorRecord;

/// Errors that can occur while turning payloads into records.
///
/// Resolver queries never produce these; they only arise at the decoder
/// seam or when parsing wire strings strictly.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Payload was not valid JSON for the requested record.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Strict parse of a wire string that the lookup table does not know.
    #[error("Unknown {kind} value: '{value}'")]
    UnknownWireValue {
        /// Which wire enum was being parsed
        kind: &'static str,
        /// The offending token
        value: String,
    },

    /// The server answered with a non-success status.
    #[error("API error: {}", .0.log_string())]
    Api(Box<ErrorRecord>),
}

impl ModelError {
    /// The classified failure, if this error came from the API.
    pub fn api_record(&self) -> Option<&ErrorRecord> {
        match self {
            ModelError::Api(record) => Some(record),
            _ => None,
        }
    }

    /// Checks whether retrying the same call could succeed.
    ///
    /// Only API failures caused by connectivity or a temporarily unavailable
    /// service qualify; decode problems are permanent.
    pub fn is_retryable(&self) -> bool {
        self.api_record()
            .is_some_and(|record| record.is_network_error() || record.is_service_unavailable())
    }
}

impl From<ErrorRecord> for ModelError {
    fn from(record: ErrorRecord) -> Self {
        ModelError::Api(Box::new(record))
    }
}
