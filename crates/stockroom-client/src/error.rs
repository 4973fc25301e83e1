//! # Client Error Types
//!
//! Error types for everything that talks to the backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Envelope            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Rejected (success=no)  │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  MissingData            │ │
//! │  │  ConfigLoad/Save│  │  Http (status)  │  │  Deserialization        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │     Session     │  │   Validation    │                              │
//! │  │                 │  │                 │                              │
//! │  │  NotLoggedIn    │  │  field rules    │                              │
//! │  │  Unauthorized   │  │  before sending │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::ValidationError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Every way a backend interaction can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Base URL could not be parsed or joined.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request took longer than the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Non-success HTTP status. `message` is the envelope message when the
    /// body carried one.
    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // =========================================================================
    // Envelope Errors
    // =========================================================================
    /// The backend answered `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    /// A success envelope without the payload the operation needs.
    #[error("Response to {operation} carried no data")]
    MissingData { operation: String },

    /// Response body was not the expected JSON.
    #[error("Malformed response: {0}")]
    Deserialization(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Operation needs a logged-in session.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Backend refused the session (HTTP 401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Input rejected before a request was built.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Deserialization(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Deserialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if repeating the same request could succeed.
    ///
    /// Nothing in this workspace retries automatically: stock commits are
    /// not idempotent. This only drives the wording of user notices.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout => true,
            ClientError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the user has to log in (again).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::NotLoggedIn | ClientError::Unauthorized(_))
    }

    /// The message to show the user.
    ///
    /// Backend messages are shown as sent; everything else uses the
    /// error's display text.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message } | ClientError::Http { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::ConnectionFailed("refused".into()).is_retryable());
        assert!(ClientError::Http {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(!ClientError::Http {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
        assert!(!ClientError::Rejected {
            message: "nope".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_config_and_auth_classification() {
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
        assert!(!ClientError::Timeout.is_config_error());
        assert!(ClientError::NotLoggedIn.is_auth_error());
        assert!(ClientError::Unauthorized("expired".into()).is_auth_error());
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::Rejected {
            message: "Item not found".into(),
        };
        assert_eq!(err.user_message(), "Item not found");

        let err = ClientError::Http {
            status: 500,
            message: "Database unavailable".into(),
        };
        assert_eq!(err.user_message(), "Database unavailable");
        assert_eq!(ClientError::NotLoggedIn.user_message(), "Not logged in");
    }

    #[test]
    fn test_validation_converts() {
        let err: ClientError = ValidationError::Required {
            field: "email".into(),
        }
        .into();
        assert_eq!(err.to_string(), "email is required");
    }
}
