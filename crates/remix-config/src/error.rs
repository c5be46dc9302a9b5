//! Error types for remix-config

use std::path::PathBuf;

pub use remix_routes::BoxError;

/// Result type for configuration resolution
pub type Result<T> = std::result::Result<T, Error>;

/// The preset lifecycle hook that was running when a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookName {
    RemixConfig,
    RemixConfigResolved,
}

impl std::fmt::Display for HookName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemixConfig => write!(f, "remixConfig"),
            Self::RemixConfigResolved => write!(f, "remixConfigResolved"),
        }
    }
}

/// Errors that can occur while resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A preset hook failed; resolution is aborted
    #[error("Preset {preset:?} failed in {hook} hook: {source}")]
    PresetHook {
        preset: String,
        hook: HookName,
        #[source]
        source: BoxError,
    },

    /// A key outside the known configuration key set
    #[error("Unknown config key: {key}")]
    UnknownConfigKey { key: String },

    /// A key holds a value of the wrong shape
    #[error("Invalid value for config key {key}: expected {expected}")]
    InvalidConfigValue { key: String, expected: String },

    /// A function-valued key appeared where only data is allowed
    #[error("Config key {key} cannot be set from a config file")]
    NotSerializable { key: String },

    /// A preset name that no registry entry provides
    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    /// An attempt to mutate resolved configuration
    #[error("Resolved config is frozen; cannot set {path}")]
    FrozenConfig { path: String },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Error from route tree handling
    #[error(transparent)]
    Routes(#[from] remix_routes::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_value(key: impl std::fmt::Display, expected: &str) -> Self {
        Self::InvalidConfigValue {
            key: key.to_string(),
            expected: expected.to_string(),
        }
    }
}
