//! Error types for remix-build

use std::path::PathBuf;

use remix_config::BoxError;

/// Result type for build orchestration
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config resolution failed; the bundler was never started
    #[error("Config resolution failed: {0}")]
    Resolution(#[from] remix_config::Error),

    /// The bundler exited non-zero or wrote to stderr
    #[error("Build failed (exit code: {exit_code:?}){}", stderr_suffix(.stderr))]
    BuildTriggerFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The bundler process could not be started
    #[error("Failed to start build command {program:?}: {source}")]
    TriggerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Manifest assembly failed
    #[error("Failed to build manifest: {0}")]
    Manifest(#[from] remix_routes::Error),

    /// The `buildEnd` hook failed after a successful build
    #[error("buildEnd hook failed: {source}")]
    BuildEndFailed {
        #[source]
        source: BoxError,
    },

    /// A build-end payload could not be written
    #[error("Failed to write build-end payload to {path}: {message}")]
    PayloadWrite { path: PathBuf, message: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
