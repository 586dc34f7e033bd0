//! Error types for record synchronization
//!
//! Every failure the synchronizer can observe maps onto one variant here.
//! `InvalidRecordType`, `Transport` and `Provider` fail a single row; the
//! others stop the invocation before any row is processed.

use thiserror::Error;

/// Result type alias for pbdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pbdns
#[derive(Error, Debug)]
pub enum Error {
    /// Credential file missing, unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record type outside the provider whitelist
    #[error("Invalid record type '{record_type}'. Must be one of: {allowed}")]
    InvalidRecordType {
        /// The type as it was declared
        record_type: String,
        /// Comma-separated whitelist, for the log line
        allowed: String,
    },

    /// Batch action other than create/update/delete
    #[error("Invalid action '{0}'. Must be one of: create, update, delete")]
    InvalidAction(String),

    /// Connection-level failure (DNS resolution, refused, reset, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a status other than 200
    #[error("Provider error ({status}): {message}")]
    Provider {
        /// HTTP status code returned by the provider
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Declaration file missing, unreadable or malformed
    #[error("Declaration file error: {0}")]
    DeclarationFile(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a provider error
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Create a declaration file error
    pub fn declaration_file(msg: impl Into<String>) -> Self {
        Self::DeclarationFile(msg.into())
    }

    /// Create an invalid action error
    pub fn invalid_action(action: impl Into<String>) -> Self {
        Self::InvalidAction(action.into())
    }
}
