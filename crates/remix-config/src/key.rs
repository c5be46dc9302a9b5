//! The fixed set of configuration keys

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A configuration key
///
/// Patches are keyed maps, but only these keys exist. Variants are declared
/// in the camelCase name order used for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfigKey {
    #[serde(rename = "appDirectory")]
    AppDirectory,
    #[serde(rename = "buildDirectory")]
    BuildDirectory,
    #[serde(rename = "buildEnd")]
    BuildEnd,
    #[serde(rename = "future")]
    Future,
    #[serde(rename = "ignoredRouteFiles")]
    IgnoredRouteFiles,
    #[serde(rename = "manifest")]
    Manifest,
    #[serde(rename = "presets")]
    Presets,
    #[serde(rename = "publicPath")]
    PublicPath,
    #[serde(rename = "routes")]
    Routes,
    #[serde(rename = "serverBuildFile")]
    ServerBuildFile,
    #[serde(rename = "serverBundles")]
    ServerBundles,
    #[serde(rename = "serverModuleFormat")]
    ServerModuleFormat,
    #[serde(rename = "unstable_ssr")]
    UnstableSsr,
}

/// Keys a patch may carry but the merger always discards
///
/// The preset list is fixed before resolution starts; no patch can extend it.
pub const MERGE_DENY_LIST: &[ConfigKey] = &[ConfigKey::Presets];

/// Keys present on every resolved configuration, in serialization order
pub const RESOLVED_KEYS: &[ConfigKey] = &[
    ConfigKey::AppDirectory,
    ConfigKey::BuildDirectory,
    ConfigKey::BuildEnd,
    ConfigKey::Future,
    ConfigKey::Manifest,
    ConfigKey::PublicPath,
    ConfigKey::Routes,
    ConfigKey::ServerBuildFile,
    ConfigKey::ServerBundles,
    ConfigKey::ServerModuleFormat,
    ConfigKey::UnstableSsr,
];

impl ConfigKey {
    /// Every key, in name order
    pub const ALL: &'static [ConfigKey] = &[
        Self::AppDirectory,
        Self::BuildDirectory,
        Self::BuildEnd,
        Self::Future,
        Self::IgnoredRouteFiles,
        Self::Manifest,
        Self::Presets,
        Self::PublicPath,
        Self::Routes,
        Self::ServerBuildFile,
        Self::ServerBundles,
        Self::ServerModuleFormat,
        Self::UnstableSsr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppDirectory => "appDirectory",
            Self::BuildDirectory => "buildDirectory",
            Self::BuildEnd => "buildEnd",
            Self::Future => "future",
            Self::IgnoredRouteFiles => "ignoredRouteFiles",
            Self::Manifest => "manifest",
            Self::Presets => "presets",
            Self::PublicPath => "publicPath",
            Self::Routes => "routes",
            Self::ServerBuildFile => "serverBuildFile",
            Self::ServerBundles => "serverBundles",
            Self::ServerModuleFormat => "serverModuleFormat",
            Self::UnstableSsr => "unstable_ssr",
        }
    }

    /// Whether the key holds behavior rather than data
    pub fn is_function(self) -> bool {
        matches!(self, Self::BuildEnd | Self::ServerBundles)
    }

    /// Whether the merger drops this key
    pub fn is_merge_denied(self) -> bool {
        MERGE_DENY_LIST.contains(&self)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownConfigKey { key: s.to_string() })
    }
}
