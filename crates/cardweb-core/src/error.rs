//! Error types for cardweb-core
//!
//! Every failed call to the bank cards API ends up as one of two kinds:
//! the server answered with a non-success status ([`ClientError::RequestFailed`]),
//! or no usable answer arrived at all ([`ClientError::TransportFailed`]).
//! Both are terminal for the user action that triggered them.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Fallback text when an error body carries no usable `message`
pub const DEFAULT_ERROR_MESSAGE: &str = "Operation failed";

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Server returned a non-success status
    RequestFailed,
    /// Network, connectivity or body decoding failure
    TransportFailed,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::RequestFailed => write!(f, "REQUEST_FAILED"),
            ErrorCode::TransportFailed => write!(f, "TRANSPORT_FAILED"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Rejected by the server, usually a user input problem
    Warning,
    /// Server fault or unreachable server
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// HTTP status (for request failures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

/// Main error type for cardweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("{message}")]
    TransportFailed { message: String },
}

impl ClientError {
    /// Build a request failure from an error response body
    pub fn from_response(status: u16, body: &[u8], fallback: &str) -> Self {
        ClientError::RequestFailed {
            status,
            message: extract_error_message(body, fallback),
        }
    }

    /// Build a transport failure from any displayable error
    pub fn transport(error: impl std::fmt::Display) -> Self {
        ClientError::TransportFailed {
            message: error.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::RequestFailed { .. } => ErrorCode::RequestFailed,
            ClientError::TransportFailed { .. } => ErrorCode::TransportFailed,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClientError::RequestFailed { status, .. } if *status < 500 => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Text shown to the user: the message behind a kind-specific prefix
    pub fn user_message(&self) -> String {
        match self {
            ClientError::RequestFailed { message, .. } => format!("Error: {}", message),
            ClientError::TransportFailed { message } => format!("Network error: {}", message),
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        ErrorDetails {
            code: self.code(),
            message: self.to_string(),
            status: match self {
                ClientError::RequestFailed { status, .. } => Some(*status),
                ClientError::TransportFailed { .. } => None,
            },
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

/// Pull the `message` field out of a JSON error body.
///
/// Empty bodies, non-JSON bodies, a missing `message` or an empty/non-string
/// one all yield `fallback`.
pub fn extract_error_message(body: &[u8], fallback: &str) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback.to_string())
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &ClientError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &ClientError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "cardweb::error",
                "{} - Operation: {} - Context: {}",
                error.to_details(),
                context.operation,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "cardweb::error",
                "{} - Operation: {} - Context: {}",
                error.to_details(),
                context.operation,
                context.data
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "cardweb::error",
            "WARNING: {} - Operation: {} - Context: {}",
            message,
            context.operation,
            context.data
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_json_body() {
        let body = br#"{"message":"Insufficient funds"}"#;
        assert_eq!(extract_error_message(body, DEFAULT_ERROR_MESSAGE), "Insufficient funds");
    }

    #[test]
    fn test_extract_message_fallbacks() {
        assert_eq!(extract_error_message(b"", "Transfer failed"), "Transfer failed");
        assert_eq!(extract_error_message(b"<html>502</html>", DEFAULT_ERROR_MESSAGE), "Operation failed");
        assert_eq!(extract_error_message(br#"{"error":"x"}"#, DEFAULT_ERROR_MESSAGE), "Operation failed");
        assert_eq!(extract_error_message(br#"{"message":""}"#, DEFAULT_ERROR_MESSAGE), "Operation failed");
        assert_eq!(extract_error_message(br#"{"message":42}"#, DEFAULT_ERROR_MESSAGE), "Operation failed");
    }

    #[test]
    fn test_user_message_prefixes() {
        let error = ClientError::from_response(400, br#"{"message":"Insufficient funds"}"#, DEFAULT_ERROR_MESSAGE);
        assert_eq!(error.user_message(), "Error: Insufficient funds");

        let error = ClientError::transport("connection refused");
        assert_eq!(error.user_message(), "Network error: connection refused");
    }

    #[test]
    fn test_error_code_and_severity() {
        let error = ClientError::RequestFailed { status: 404, message: "Card not found".to_string() };
        assert_eq!(error.code(), ErrorCode::RequestFailed);
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = ClientError::RequestFailed { status: 503, message: "down".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Error);

        let error = ClientError::transport("timed out");
        assert_eq!(error.code(), ErrorCode::TransportFailed);
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_details_display() {
        let error = ClientError::RequestFailed { status: 400, message: "Bad card".to_string() };
        assert_eq!(error.to_details().to_string(), "[REQUEST_FAILED] Bad card (HTTP 400)");

        let error = ClientError::transport("reset");
        assert_eq!(error.to_details().to_string(), "[TRANSPORT_FAILED] reset");
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("transfer")
            .with_data("fromCardId", serde_json::json!(1));
        assert_eq!(context.operation, "transfer");
        assert_eq!(context.data["fromCardId"], 1);
    }
}
