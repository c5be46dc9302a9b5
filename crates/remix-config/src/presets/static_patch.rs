use async_trait::async_trait;

use crate::error::{BoxError, Result};
use crate::patch::ConfigPatch;
use crate::preset::{Preset, RemixConfigArgs};

/// A preset that always contributes the same fixed patch
///
/// Config files declare these as `[preset.<name>]` tables.
#[derive(Debug, Clone)]
pub struct StaticPreset {
    name: String,
    patch: ConfigPatch,
}

impl StaticPreset {
    pub fn new(name: impl Into<String>, patch: ConfigPatch) -> Self {
        Self {
            name: name.into(),
            patch,
        }
    }

    /// Build from a TOML table with camelCase config keys
    pub fn from_toml_table(name: impl Into<String>, table: toml::Table) -> Result<Self> {
        Ok(Self::new(name, ConfigPatch::from_toml_table(table)?))
    }

    pub fn patch(&self) -> &ConfigPatch {
        &self.patch
    }
}

#[async_trait]
impl Preset for StaticPreset {
    fn name(&self) -> &str {
        &self.name
    }

    async fn remix_config(
        &self,
        _args: RemixConfigArgs<'_>,
    ) -> std::result::Result<Option<ConfigPatch>, BoxError> {
        if self.patch.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.patch.clone()))
    }
}
