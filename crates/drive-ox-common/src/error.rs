use thiserror::Error;

/// Common errors that can occur in drive server HTTP requests
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Error response from the server, classified by HTTP status
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Message extracted from the response body
        message: String,
    },
}

/// Parse error response from HTTP status and body
pub fn parse_error_response(
    status: reqwest::StatusCode,
    body: &bytes::Bytes,
) -> CommonRequestError {
    // Try to parse as JSON error first
    if let Ok(json_value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(error_message) = extract_error_message(&json_value) {
            return CommonRequestError::Api {
                status: status.as_u16(),
                message: error_message,
            };
        }
    }

    // Fall back to raw body
    CommonRequestError::Api {
        status: status.as_u16(),
        message: String::from_utf8_lossy(body).to_string(),
    }
}

/// Extract error message from the server's JSON error formats
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // Wrapped format: {"error": {"message": "..."}}
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    // Flat format: {"message": "..."}
    if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }

    None
}
