//! Preset-based configuration resolution for the Remix build pipeline
//!
//! This crate turns an ordered list of presets plus the user's own config
//! into a single immutable [`ResolvedConfig`]:
//!
//! - **Patches**: partial configurations keyed by [`ConfigKey`]
//! - **Merging**: shallow last-writer-wins folding, `presets` always dropped
//! - **Precedence**: the user patch is merged after every preset
//! - **Freezing**: typed, read-only [`ResolvedConfig`] shared behind an `Arc`
//! - **Hooks**: sequential `remixConfig` / `remixConfigResolved` invocation
//!
//! # Architecture
//!
//! ```text
//!                  remix-cli
//!                      |
//!                 remix-build
//!                  /        \
//!        remix-config -> remix-routes
//! ```
//!
//! # Example
//!
//! ```ignore
//! use remix_config::{ConfigPatch, ConfigResolver, PresetRegistry, UserConfig};
//!
//! let registry = PresetRegistry::with_builtins();
//! let user = UserConfig::new(
//!     registry.resolve_all(["server-bundles:top-level"])?,
//!     ConfigPatch::new().build_directory("dist"),
//! );
//! let resolved = ConfigResolver::new(user).with_routes(routes).resolve().await?;
//! assert_eq!(resolved.build_directory(), "dist");
//! ```

pub mod error;
pub mod key;
pub mod merge;
pub mod patch;
pub mod preset;
pub mod presets;
pub mod resolved;
pub mod resolver;
pub mod user;
pub mod value;

pub use error::{BoxError, Error, HookName, Result};
pub use key::{ConfigKey, MERGE_DENY_LIST, RESOLVED_KEYS};
pub use merge::{AccumulatedConfig, merge_patches, resolve_precedence};
pub use patch::{ConfigPatch, toml_to_json_value};
pub use preset::{BuildEndArgs, BuildEndHook, Preset, RemixConfigArgs, RemixConfigResolvedArgs};
pub use presets::{PresetRegistry, StaticPreset, TopLevelBundlesPreset};
pub use resolved::{ResolvedConfig, ServerModuleFormat, freeze};
pub use resolver::ConfigResolver;
pub use user::{CONFIG_FILE_NAME, UserConfig};
pub use value::{ConfigValue, FrozenValue};
