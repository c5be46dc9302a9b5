//! User configuration and the `remix.config.toml` file format
//!
//! ```toml
//! presets = ["server-bundles:top-level", "dist"]
//! ignoredRouteFiles = ["**/.*"]
//!
//! [future]
//! v3_singleFetch = true
//!
//! [preset.dist]
//! buildDirectory = "dist"
//! ```
//!
//! Top-level camelCase keys form the user patch. `presets` lists presets by
//! name, in order. `[preset.<name>]` tables declare static presets that can
//! then be listed by name.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::patch::ConfigPatch;
use crate::preset::Preset;
use crate::presets::{PresetRegistry, StaticPreset};

/// Default config file name, looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "remix.config.toml";

const PRESETS_FIELD: &str = "presets";
const PRESET_TABLES_FIELD: &str = "preset";

/// The consumer's configuration: an ordered preset list and a patch merged last
#[derive(Clone, Default)]
pub struct UserConfig {
    pub presets: Vec<Arc<dyn Preset>>,
    pub patch: ConfigPatch,
}

impl UserConfig {
    pub fn new(presets: Vec<Arc<dyn Preset>>, patch: ConfigPatch) -> Self {
        Self { presets, patch }
    }

    /// Load from a TOML file, resolving preset names through `registry`
    pub fn load(path: &Path, registry: &PresetRegistry) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading user config");
        Self::parse(&content, registry)
    }

    /// Parse TOML content, resolving preset names through `registry`
    ///
    /// Static presets declared in the file are visible only to this config.
    pub fn parse(content: &str, registry: &PresetRegistry) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(content)?;

        let names = match table.remove(PRESETS_FIELD) {
            None => Vec::new(),
            Some(toml::Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    toml::Value::String(name) => Ok(name),
                    _ => Err(Error::invalid_value(PRESETS_FIELD, "a list of preset names")),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(Error::invalid_value(PRESETS_FIELD, "a list of preset names"));
            }
        };

        let mut registry = registry.clone();
        match table.remove(PRESET_TABLES_FIELD) {
            None => {}
            Some(toml::Value::Table(declared)) => {
                for (name, body) in declared {
                    let toml::Value::Table(body) = body else {
                        return Err(Error::invalid_value(
                            format!("{PRESET_TABLES_FIELD}.{name}"),
                            "a table of config keys",
                        ));
                    };
                    registry.register(Arc::new(StaticPreset::from_toml_table(name, body)?));
                }
            }
            Some(_) => {
                return Err(Error::invalid_value(
                    PRESET_TABLES_FIELD,
                    "a table of preset declarations",
                ));
            }
        }

        let presets = registry.resolve_all(&names)?;
        let patch = ConfigPatch::from_toml_table(table)?;
        Ok(Self { presets, patch })
    }

    /// Names of the configured presets, in order
    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name()).collect()
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field("presets", &self.preset_names())
            .field("patch", &self.patch)
            .finish()
    }
}
