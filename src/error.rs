//! Error types for the AEO audit.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors raised by the collaborators around the core
//! - `CommandError`: Wrapper for errors surfaced to the caller (serializable)
//! - `Result<T>`: Type alias for Results using AppError
//!
//! The scoring core itself never fails; only fetching, configuration and the
//! FAQ generation service produce errors.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for application operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network request failed before a response arrived
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The remote end answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The FAQ endpoint answered with something other than `{ "faqs": [...] }`
    #[error("Malformed response from {service}: {message}")]
    MalformedResponse { service: &'static str, message: String },

    /// FAQ generation was requested but no endpoint is configured
    #[error("FAQ generation service is not configured (set faq.api_url or FAQ_API_URL)")]
    FaqServiceNotConfigured,

    /// FAQ generation needs a report that has not been produced yet
    #[error("No report available; analyze a page first")]
    NoReport,

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(service: &'static str, msg: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service,
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::HttpStatus {
                status: status.as_u16(),
                url: error.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => Self::NetworkError(error.to_string()),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// COMMAND ERROR (FOR CALLERS)
// ============================================================================

/// Wrapper for errors returned from session commands.
/// This type is serializable and can be handed to whatever renders the state.
#[derive(Debug)]
pub struct CommandError(pub anyhow::Error);

impl std::error::Error for CommandError {}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:#}", self.0))
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(error: anyhow::Error) -> Self {
        Self(error)
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_serializes_as_message() {
        let err = CommandError::from(AppError::HttpStatus {
            status: 404,
            url: "https://example.com/missing".into(),
        });
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"HTTP 404 from https://example.com/missing\"");
    }

    #[test]
    fn only_network_and_server_errors_are_transient() {
        assert!(AppError::network("reset").is_transient());
        assert!(AppError::HttpStatus { status: 503, url: String::new() }.is_transient());
        assert!(!AppError::HttpStatus { status: 404, url: String::new() }.is_transient());
        assert!(!AppError::Cancelled.is_transient());
        assert!(!AppError::malformed("faq", "missing faqs").is_transient());
    }
}
