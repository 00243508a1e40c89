//! Error types for pam
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors with clear error chains.
//!
//! The grid viewer and the SQL formatter never appear here: navigation,
//! selection and formatting are total and always clamp to a valid state.

use std::io;

/// Main error type for the pam application
#[derive(Debug, thiserror::Error)]
pub enum PamError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors (terminal setup, event stream, drawing)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Command errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Connection string could not be parsed
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Platform config directory not found
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// Failed to read or write the config file
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// No connection has been selected yet
    #[error("No current connection; run `pam init` or `pam switch` first")]
    NoCurrentConnection,

    /// Connection profile not found
    #[error("Connection '{0}' does not exist")]
    ConnectionNotFound(String),

    /// Saved query not found by name or id
    #[error("Could not find query with name/id: {0}")]
    QueryNotFound(String),
}

/// Command parsing and execution errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Database type is not supported by this build
    #[error("Unsupported database type: {0}")]
    UnsupportedDbType(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// External editor failed
    #[error("Failed to open editor: {0}")]
    EditorFailed(String),
}

/// Specialized Result type for pam operations
pub type Result<T> = std::result::Result<T, PamError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for command operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_converts_into_pam_error() {
        let err: PamError = DbError::QueryFailed("syntax error".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Database error: Query execution failed: syntax error"
        );
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::QueryNotFound("7".to_string()).to_string(),
            "Could not find query with name/id: 7"
        );
        assert_eq!(
            ConfigError::ConnectionNotFound("prod".to_string()).to_string(),
            "Connection 'prod' does not exist"
        );
    }
}
