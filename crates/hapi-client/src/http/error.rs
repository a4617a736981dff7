/*
[INPUT]:  Error sources (HTTP, XML, decompression, remote status, lookups)
[OUTPUT]: Structured error types carrying remote code/message or raw body
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the hAPI client
#[derive(Error, Debug)]
pub enum HapiError {
    /// HTTP transport failed (DNS, connection, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote side answered with `stat="fail"`
    #[error("Error {code}: {message}")]
    Remote { code: String, message: String },

    /// Response did not follow the `stat` protocol
    #[error("Invalid XML: {body}")]
    Protocol { body: String },

    /// No device matched the requested label
    #[error("No device found with label {label}")]
    LabelNotFound { label: String },

    /// Signed call attempted before credentials were set
    #[error("No API key/secret configured, authenticate first")]
    MissingCredentials,

    /// Endpoint or client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Body is not well-formed XML
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Compressed body could not be inflated
    #[error("Failed to decompress response: {0}")]
    Decompression(#[from] std::io::Error),
}

impl HapiError {
    /// Check if the remote API reported this failure
    pub fn is_remote(&self) -> bool {
        matches!(self, HapiError::Remote { .. })
    }

    /// Remote error code, if any
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            HapiError::Remote { code, .. } => Some(code),
            _ => None,
        }
    }

    pub(crate) fn protocol(body: impl Into<String>) -> Self {
        HapiError::Protocol { body: body.into() }
    }
}

/// Result type alias for hAPI operations
pub type Result<T> = std::result::Result<T, HapiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = HapiError::Remote {
            code: "4".to_string(),
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "Error 4: bad key");
        assert!(err.is_remote());
        assert_eq!(err.remote_code(), Some("4"));
    }

    #[test]
    fn test_non_remote_errors() {
        let err = HapiError::LabelNotFound {
            label: "web9".to_string(),
        };
        assert!(!err.is_remote());
        assert_eq!(err.remote_code(), None);
        assert_eq!(err.to_string(), "No device found with label web9");
    }

    #[test]
    fn test_protocol_error_carries_body() {
        let err = HapiError::protocol("<rsp stat=\"weird\"/>");
        match err {
            HapiError::Protocol { body } => assert_eq!(body, "<rsp stat=\"weird\"/>"),
            _ => panic!("Expected Protocol error variant"),
        }
    }
}
