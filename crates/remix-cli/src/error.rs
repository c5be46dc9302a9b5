//! Error types for remix-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from remix-config
    #[error(transparent)]
    Config(#[from] remix_config::Error),

    /// Error from remix-routes
    #[error(transparent)]
    Routes(#[from] remix_routes::Error),

    /// Error from remix-build
    #[error(transparent)]
    Build(#[from] remix_build::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
