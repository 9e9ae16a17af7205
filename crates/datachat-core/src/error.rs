//! Error types for the Datachat engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Datachat engine.
///
/// Backend calls, configuration loading and session operations all report
/// through this enum. The conversation layer turns the query-related variants
/// into rendered assistant messages, so none of them reach the host page.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatachatError {
    /// The backend could not be reached (connection refused, DNS, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A deadline elapsed before the backend answered.
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend answered with a structured error or a non-success status.
    #[error("Server error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Server {
        status: Option<u16>,
        message: String,
    },

    /// A success response whose body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DatachatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Server error
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a Server error
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DatachatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DatachatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DatachatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for DatachatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DatachatError>`.
pub type Result<T> = std::result::Result<T, DatachatError>;

/// User-facing classification of a failed `query` call.
///
/// Each class maps to a distinct assistant message. Anything that is not a
/// timeout or a server-provided message is treated as a connectivity problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    Transport,
    Timeout,
    Server(String),
}

impl From<&DatachatError> for QueryFailure {
    fn from(err: &DatachatError) -> Self {
        match err {
            DatachatError::Timeout { .. } => QueryFailure::Timeout,
            DatachatError::Server { message, .. } => QueryFailure::Server(message.clone()),
            _ => QueryFailure::Transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_status() {
        let err = DatachatError::server(Some(503), "Query pipeline not initialized");
        assert_eq!(
            err.to_string(),
            "Server error (503): Query pipeline not initialized"
        );

        let err = DatachatError::server(None, "No files loaded");
        assert_eq!(err.to_string(), "Server error: No files loaded");
    }

    #[test]
    fn query_failure_classification() {
        assert_eq!(
            QueryFailure::from(&DatachatError::Timeout { seconds: 60 }),
            QueryFailure::Timeout
        );
        assert_eq!(
            QueryFailure::from(&DatachatError::transport("connection refused")),
            QueryFailure::Transport
        );
        assert_eq!(
            QueryFailure::from(&DatachatError::decode("bad json")),
            QueryFailure::Transport
        );
        assert_eq!(
            QueryFailure::from(&DatachatError::server(Some(400), "No files loaded")),
            QueryFailure::Server("No files loaded".to_string())
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DatachatError = io.into();
        assert!(matches!(err, DatachatError::Io { .. }));
    }
}
