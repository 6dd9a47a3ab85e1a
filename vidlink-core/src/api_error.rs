//! Failed API calls and their classification.
//!
//! [`ErrorRecord`] is plain data: the decoded error body plus whatever the
//! transport knew about the failure. The predicates on it answer the fixed
//! set of questions callers ask before deciding to retry, re-authenticate or
//! prompt the user. None of them fail.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::wire::WireValue;

/// Response header carrying the authentication challenge.
pub const AUTHENTICATION_HEADER: &str = "WWW-Authenticate";

/// Challenge value sent when the bearer token is no longer valid.
pub const AUTHENTICATION_TOKEN_ERROR: &str = "Bearer error=\"invalid_token\"";

/// Structured error codes the client reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "&'static str")]
pub enum ErrorCode {
    /// No code, or one this client does not know.
    #[default]
    Default,
    InvalidInputVideoPasswordMismatch,
    InvalidInputVideoNoPassword,
    DrmStreamLimitHit,
    DrmDeviceLimitHit,
    DrmConcurrentStreamLimitHit,
    UploadQuotaSizeExceeded,
    UploadQuotaDailyExceeded,
    InvalidToken,
}

impl ErrorCode {
    fn is_password_error(self) -> bool {
        matches!(
            self,
            Self::InvalidInputVideoNoPassword | Self::InvalidInputVideoPasswordMismatch
        )
    }
}

impl WireValue for ErrorCode {
    const KIND: &'static str = "error code";
    const ALL: &'static [Self] = &[
        Self::Default,
        Self::InvalidInputVideoPasswordMismatch,
        Self::InvalidInputVideoNoPassword,
        Self::DrmStreamLimitHit,
        Self::DrmDeviceLimitHit,
        Self::DrmConcurrentStreamLimitHit,
        Self::UploadQuotaSizeExceeded,
        Self::UploadQuotaDailyExceeded,
        Self::InvalidToken,
    ];

    fn as_wire(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::InvalidInputVideoPasswordMismatch => "2222",
            Self::InvalidInputVideoNoPassword => "2223",
            Self::DrmStreamLimitHit => "3420",
            Self::DrmDeviceLimitHit => "3421",
            Self::DrmConcurrentStreamLimitHit => "3422",
            Self::UploadQuotaSizeExceeded => "4101",
            Self::UploadQuotaDailyExceeded => "4102",
            Self::InvalidToken => "8003",
        }
    }
}

impl From<ErrorCode> for &'static str {
    fn from(code: ErrorCode) -> Self {
        code.as_wire()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One rejected request field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvalidParameter {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::lenient")]
    pub error_code: Option<ErrorCode>,
    #[serde(default)]
    pub developer_message: Option<String>,
}

/// Error body as the server sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// User-facing message.
    #[serde(default, rename = "error")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub developer_message: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::lenient")]
    pub error_code: Option<ErrorCode>,
    #[serde(default)]
    pub invalid_parameters: Option<Vec<InvalidParameter>>,
}

/// Status line and headers of a response that did arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Header pairs in arrival order; names may repeat.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Response with a status and no headers.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Appends a header pair, keeping earlier values of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// All values of a header, matched case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Status in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Local failure raised before any response arrived.
pub type FailureCause = Arc<dyn std::error::Error + Send + Sync>;

/// A failed call, ready for classification.
#[derive(Clone, Default)]
pub struct ErrorRecord {
    body: ErrorBody,
    response: Option<TransportResponse>,
    cause: Option<FailureCause>,
    cancelled: bool,
    fallback_status: Option<u16>,
}

impl fmt::Debug for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("body", &self.body)
            .field("response", &self.response)
            .field("cause", &self.cause.as_ref().map(ToString::to_string))
            .field("cancelled", &self.cancelled)
            .field("fallback_status", &self.fallback_status)
            .finish()
    }
}

/// Assembles an [`ErrorRecord`]. Transport facts that the original request
/// learned after the body was decoded go in here, not through later
/// mutation.
#[derive(Debug, Default)]
pub struct ErrorRecordBuilder {
    record: ErrorRecord,
}

impl ErrorRecordBuilder {
    /// Decoded error body.
    pub fn body(mut self, body: ErrorBody) -> Self {
        self.record.body = body;
        self
    }

    /// Response that carried the error.
    pub fn response(mut self, response: TransportResponse) -> Self {
        self.record.response = Some(response);
        self
    }

    /// Local failure that stopped the call.
    pub fn cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.record.cause = Some(Arc::new(cause));
        self
    }

    /// Marks the failure as a user-initiated cancellation.
    pub fn cancelled(mut self, cancelled: bool) -> Self {
        self.record.cancelled = cancelled;
        self
    }

    /// Status reported when no response exists.
    pub fn fallback_status(mut self, status: u16) -> Self {
        self.record.fallback_status = Some(status);
        self
    }

    /// Adds a rejected field to the body.
    pub fn invalid_parameter(
        mut self,
        field: impl Into<String>,
        code: ErrorCode,
        developer_message: impl Into<String>,
    ) -> Self {
        self.record
            .add_invalid_parameter(field, code, developer_message);
        self
    }

    /// Finishes the record.
    pub fn build(self) -> ErrorRecord {
        self.record
    }
}

impl From<ErrorBody> for ErrorRecord {
    fn from(body: ErrorBody) -> Self {
        ErrorRecord::builder().body(body).build()
    }
}

impl ErrorRecord {
    /// Starts an empty record.
    pub fn builder() -> ErrorRecordBuilder {
        ErrorRecordBuilder::default()
    }

    /// Record for a local failure that never reached the server.
    pub fn from_cause(
        developer_message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ErrorRecord::builder()
            .body(ErrorBody {
                developer_message: Some(developer_message.into()),
                ..ErrorBody::default()
            })
            .cause(cause)
            .build()
    }

    /// Decoded error body, default when the server sent none.
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Transport response, `None` for local failures.
    pub fn response(&self) -> Option<&TransportResponse> {
        self.response.as_ref()
    }

    /// Local failure behind the record, if any.
    pub fn cause(&self) -> Option<&FailureCause> {
        self.cause.as_ref()
    }

    /// The caller cancelled the request.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Raw user-facing message from the server.
    pub fn error_message(&self) -> Option<&str> {
        self.body.error_message.as_deref()
    }

    /// Help link from the server.
    pub fn link(&self) -> Option<&str> {
        self.body.link.as_deref()
    }

    /// Developer message, falling back to the server message when empty.
    pub fn developer_message(&self) -> Option<&str> {
        self.body
            .developer_message
            .as_deref()
            .filter(|message| !message.is_empty())
            .or_else(|| self.error_message())
    }

    /// Top-level code, `Default` when absent or unknown.
    pub fn error_code(&self) -> ErrorCode {
        self.body.error_code.unwrap_or_default()
    }

    /// Rejected fields. An empty list reads as absent.
    pub fn invalid_parameters(&self) -> Option<&[InvalidParameter]> {
        self.body
            .invalid_parameters
            .as_deref()
            .filter(|parameters| !parameters.is_empty())
    }

    /// First rejected field.
    pub fn invalid_parameter(&self) -> Option<&InvalidParameter> {
        self.invalid_parameters()?.first()
    }

    /// Code of the first rejected field.
    pub fn invalid_parameter_error_code(&self) -> Option<ErrorCode> {
        self.invalid_parameter()?.error_code
    }

    /// Appends a rejected field, creating the list on first use.
    pub fn add_invalid_parameter(
        &mut self,
        field: impl Into<String>,
        code: ErrorCode,
        developer_message: impl Into<String>,
    ) {
        let parameter = InvalidParameter {
            field: Some(field.into()),
            error_code: Some(code),
            developer_message: Some(developer_message.into()),
        };
        tracing::debug!(field = ?parameter.field, code = %code, "Adding invalid parameter");
        self.body
            .invalid_parameters
            .get_or_insert_with(Vec::new)
            .push(parameter);
    }

    /// The call failed before any response arrived (connectivity, closed
    /// socket). Cancellations never count.
    pub fn is_network_error(&self) -> bool {
        !self.cancelled && self.response.is_none()
    }

    fn has_status(&self, status: u16) -> bool {
        self.response
            .as_ref()
            .is_some_and(|response| response.status == status)
    }

    /// HTTP 503 from the server.
    pub fn is_service_unavailable(&self) -> bool {
        self.has_status(503)
    }

    /// HTTP 403 from the server.
    pub fn is_forbidden(&self) -> bool {
        self.has_status(403)
    }

    /// 401 whose challenge says the bearer token is invalid.
    pub fn is_invalid_token(&self) -> bool {
        self.response.as_ref().is_some_and(|response| {
            response.status == 401
                && response
                    .header_values(AUTHENTICATION_HEADER)
                    .any(|value| value == AUTHENTICATION_TOKEN_ERROR)
        })
    }

    /// The media needs a password, judged from the first invalid
    /// parameter or the top-level code.
    pub fn is_password_required(&self) -> bool {
        self.invalid_parameter_error_code()
            .is_some_and(ErrorCode::is_password_error)
            || self.error_code().is_password_error()
    }

    /// Response status, else the locally recorded fallback.
    pub fn effective_http_status(&self) -> Option<u16> {
        self.response
            .as_ref()
            .map(|response| response.status)
            .or(self.fallback_status)
    }

    /// Most useful single line for logs, `""` when nothing is known.
    pub fn log_string(&self) -> String {
        let non_empty = |message: &&str| !message.is_empty();

        if let Some(message) = self.developer_message().filter(non_empty) {
            return message.to_string();
        }
        if let Some(message) = self.error_message().filter(non_empty) {
            return message.to_string();
        }
        if let Some(cause) = &self.cause {
            let message = cause.to_string();
            if !message.is_empty() {
                return format!("Exception: {message}");
            }
        }
        let code = self.error_code();
        if code != ErrorCode::Default {
            return format!("Error Code {code}");
        }
        if let Some(status) = self.effective_http_status() {
            return format!("HTTP Status Code: {status}");
        }
        String::new()
    }
}
