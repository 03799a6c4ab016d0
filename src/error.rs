//! Error types for Anypoint Connect
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Anypoint Connect operations
///
/// Fatal failures (bad credentials, a rejected app creation, an unreadable
/// scope catalog) surface as one of these variants. Tolerated failures such
/// as a single rejected authorization are logged and never become an error.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The platform rejected the supplied credentials
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The scope catalog could not be read or has the wrong shape
    #[error("Scope catalog error: {0}")]
    ScopeCatalog(String),

    /// Environment listing for an organization failed
    #[error("Environment lookup error: {0}")]
    Environments(String),

    /// The management API did not answer 201 to a Connected App creation
    #[error("Failed to create the Connected App: status={status}, {message}")]
    AppCreation {
        /// HTTP status returned by the platform
        status: u16,
        /// Response body or additional context
        message: String,
    },

    /// Writing or reading a JSON artifact failed
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Reading operator input failed
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Anypoint Connect operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
