//! Client error types.

use thiserror::Error;

use crate::validation::FieldErrors;

/// Result alias used throughout the client library.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the EventDesk backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bearer token could not be decoded.
    #[error("Token decode failed: {0}")]
    TokenDecode(String),

    /// Backend answered 401; the session has been torn down.
    #[error("Unauthorized")]
    Unauthorized,

    /// Backend answered with a non-2xx status other than 401.
    #[error("{message} (status {status})")]
    Request { status: u16, message: String },

    /// No response was received at all.
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Response was well-formed but semantically unusable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client-side form validation failed; no request was sent.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Unknown catalog kind.
    #[error("Invalid Catalog Try Again")]
    InvalidCatalog(String),

    /// Session persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request was abandoned by its scope.
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Generic failure used when the server gave no usable message.
    pub(crate) fn request_failed(status: u16) -> Self {
        ClientError::Request {
            status,
            message: "Request failed".to_string(),
        }
    }

    /// Whether this error ended the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<serde_yaml::Error> for ClientError {
    fn from(e: serde_yaml::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Request {
            status: 404,
            message: "Event not found".to_string(),
        };
        assert_eq!(err.to_string(), "Event not found (status 404)");

        let err = ClientError::InvalidCatalog("venue".to_string());
        assert_eq!(err.to_string(), "Invalid Catalog Try Again");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ClientError = io_err.into();
        assert!(matches!(err, ClientError::Storage(_)));
    }

    #[test]
    fn test_request_failed_fallback() {
        match ClientError::request_failed(500) {
            ClientError::Request { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Request failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
