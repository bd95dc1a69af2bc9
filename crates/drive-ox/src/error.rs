use drive_ox_common::error::CommonRequestError;
use thiserror::Error;

/// Categorizes errors for retry logic and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rate limiting - should retry with backoff
    RateLimit,
    /// Authentication/authorization issues - should not retry
    Auth,
    /// Invalid request format - should not retry
    InvalidRequest,
    /// Network/connection issues - may retry
    Network,
    /// API temporarily unavailable - may retry
    ServiceUnavailable,
    /// Unknown/other errors
    Other,
}

#[derive(Debug, Error)]
pub enum DriveRequestError {
    /// Errors from the HTTP client
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request rejected by the server
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Unexpected response from the server
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),
}

impl DriveRequestError {
    /// Returns the error kind for categorizing errors in retry logic
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimit => ErrorKind::RateLimit,
            Self::Authentication(_) | Self::PermissionDenied(_) => ErrorKind::Auth,
            Self::InvalidRequest(_) | Self::NotFound(_) => ErrorKind::InvalidRequest,
            Self::ReqwestError(e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    ErrorKind::Network
                } else {
                    ErrorKind::Other
                }
            }
            Self::UnexpectedResponse(_) => ErrorKind::ServiceUnavailable,
            Self::SerdeError(_) => ErrorKind::Other,
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimit | ErrorKind::Network | ErrorKind::ServiceUnavailable
        )
    }
}

impl From<CommonRequestError> for DriveRequestError {
    fn from(err: CommonRequestError) -> Self {
        match err {
            CommonRequestError::Http(e) => DriveRequestError::ReqwestError(e),
            CommonRequestError::Json(e) => DriveRequestError::SerdeError(e),
            CommonRequestError::Utf8(e) => DriveRequestError::UnexpectedResponse(e.to_string()),
            CommonRequestError::Api { status, message } => match status {
                400 | 422 => DriveRequestError::InvalidRequest(message),
                401 => DriveRequestError::Authentication(message),
                403 => DriveRequestError::PermissionDenied(message),
                404 => DriveRequestError::NotFound(message),
                429 => DriveRequestError::RateLimit,
                _ => DriveRequestError::UnexpectedResponse(format!("HTTP {status}: {message}")),
            },
        }
    }
}
