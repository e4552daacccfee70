//! Error types for Quizmate
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Quizmate operations
///
/// This enum encompasses all possible errors that can occur while talking to
/// the quiz backend: configuration loading, network failures, HTTP status
/// errors, authentication failures, form validation, and the realtime push
/// channel.
#[derive(Error, Debug)]
pub enum QuizmateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/connectivity failures (no response received)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP status errors other than 401 (4xx client error, 5xx server error)
    #[error("API error ({status}): {message}")]
    Api {
        /// The HTTP status code returned by the backend
        status: u16,
        /// Human-readable message extracted from the response body
        message: String,
    },

    /// Authentication errors (401 Unauthorized, missing or invalid token)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Application-level validation errors (form field invalid)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Realtime push channel errors (connect, frame decode, close)
    #[error("Push channel error: {0}")]
    Channel(String),

    /// Credential/profile storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Quizmate operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = QuizmateError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_network_error_display() {
        let error = QuizmateError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_api_error_display() {
        let error = QuizmateError::Api {
            status: 404,
            message: "session not found".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("404"));
        assert!(s.contains("session not found"));
    }

    #[test]
    fn test_authentication_error_display() {
        let error = QuizmateError::Authentication("token expired".to_string());
        assert_eq!(error.to_string(), "Authentication error: token expired");
    }

    #[test]
    fn test_validation_error_display() {
        let error = QuizmateError::Validation("email: invalid format".to_string());
        assert_eq!(error.to_string(), "Validation error: email: invalid format");
    }

    #[test]
    fn test_channel_error_display() {
        let error = QuizmateError::Channel("socket closed".to_string());
        assert_eq!(error.to_string(), "Push channel error: socket closed");
    }

    #[test]
    fn test_storage_error_display() {
        let error = QuizmateError::Storage("profile cache unwritable".to_string());
        assert_eq!(error.to_string(), "Storage error: profile cache unwritable");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: QuizmateError = io_error.into();
        assert!(matches!(error, QuizmateError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: QuizmateError = json_error.into();
        assert!(matches!(error, QuizmateError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: QuizmateError = yaml_error.into();
        assert!(matches!(error, QuizmateError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QuizmateError>();
    }
}
