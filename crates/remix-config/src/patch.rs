//! Partial configuration fragments

use std::collections::BTreeMap;
use std::sync::Arc;

use remix_routes::{RouteNode, ServerBundles};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::key::ConfigKey;
use crate::preset::{BuildEndHook, Preset};
use crate::resolved::ServerModuleFormat;
use crate::value::ConfigValue;

/// A partial configuration contributed by a preset or the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    entries: BTreeMap<ConfigKey, ConfigValue>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set any key; later sets of the same key replace earlier ones
    pub fn set(mut self, key: ConfigKey, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: ConfigKey, value: impl Into<ConfigValue>) {
        self.entries.insert(key, value.into());
    }

    pub fn app_directory(self, dir: impl Into<String>) -> Self {
        self.set(ConfigKey::AppDirectory, Value::String(dir.into()))
    }

    pub fn build_directory(self, dir: impl Into<String>) -> Self {
        self.set(ConfigKey::BuildDirectory, Value::String(dir.into()))
    }

    pub fn public_path(self, path: impl Into<String>) -> Self {
        self.set(ConfigKey::PublicPath, Value::String(path.into()))
    }

    pub fn server_build_file(self, file: impl Into<String>) -> Self {
        self.set(ConfigKey::ServerBuildFile, Value::String(file.into()))
    }

    pub fn server_module_format(self, format: ServerModuleFormat) -> Self {
        self.set(
            ConfigKey::ServerModuleFormat,
            Value::String(format.as_str().to_string()),
        )
    }

    pub fn manifest(self, enabled: bool) -> Self {
        self.set(ConfigKey::Manifest, Value::Bool(enabled))
    }

    pub fn unstable_ssr(self, enabled: bool) -> Self {
        self.set(ConfigKey::UnstableSsr, Value::Bool(enabled))
    }

    /// Globs for route files to leave out; replaces any earlier list
    pub fn ignored_route_files<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Value::String(p.into()))
            .collect();
        self.set(ConfigKey::IgnoredRouteFiles, Value::Array(patterns))
    }

    /// Future flags object; replaces any earlier object
    pub fn future(self, flags: Value) -> Self {
        self.set(ConfigKey::Future, flags)
    }

    /// Enable or disable one future flag, keeping flags already set in this patch
    pub fn future_flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        let mut flags = match self.entries.remove(&ConfigKey::Future) {
            Some(ConfigValue::Data(Value::Object(map))) => map,
            _ => serde_json::Map::new(),
        };
        flags.insert(name.into(), Value::Bool(enabled));
        self.set(ConfigKey::Future, Value::Object(flags))
    }

    /// Extra routes added on top of the discovered route tree
    pub fn routes(self, nodes: impl IntoIterator<Item = RouteNode>) -> Self {
        let map = nodes
            .into_iter()
            .map(|node| (node.id.clone(), route_entry(node)))
            .collect();
        self.set(ConfigKey::Routes, Value::Object(map))
    }

    pub fn server_bundles(self, f: impl ServerBundles + 'static) -> Self {
        self.set(ConfigKey::ServerBundles, ConfigValue::ServerBundles(Arc::new(f)))
    }

    pub fn build_end(self, hook: impl BuildEndHook + 'static) -> Self {
        self.set(ConfigKey::BuildEnd, ConfigValue::BuildEnd(Arc::new(hook)))
    }

    /// Presets inside a patch are accepted here but never survive a merge
    pub fn presets(self, presets: Vec<Arc<dyn Preset>>) -> Self {
        self.set(ConfigKey::Presets, ConfigValue::Presets(presets))
    }

    pub fn get(&self, key: ConfigKey) -> Option<&ConfigValue> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: ConfigKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a data-only patch from a TOML table with camelCase keys
    ///
    /// Function-valued keys cannot be expressed in a file and are rejected.
    pub fn from_toml_table(table: toml::Table) -> Result<Self> {
        let mut patch = Self::new();
        for (name, value) in table {
            let key: ConfigKey = name.parse()?;
            if key.is_function() {
                return Err(Error::NotSerializable { key: name });
            }
            patch.insert(key, toml_to_json_value(value)?);
        }
        Ok(patch)
    }
}

impl IntoIterator for ConfigPatch {
    type Item = (ConfigKey, ConfigValue);
    type IntoIter = std::collections::btree_map::IntoIter<ConfigKey, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(ConfigKey, ConfigValue)> for ConfigPatch {
    fn from_iter<T: IntoIterator<Item = (ConfigKey, ConfigValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A route node in the same shape route discovery emits
fn route_entry(node: RouteNode) -> Value {
    let mut entry = serde_json::Map::new();
    entry.insert("id".to_string(), Value::String(node.id));
    if let Some(parent_id) = node.parent_id {
        entry.insert("parentId".to_string(), Value::String(parent_id));
    }
    if let Some(path) = node.path {
        entry.insert("path".to_string(), Value::String(path));
    }
    if node.index {
        entry.insert("index".to_string(), Value::Bool(true));
    }
    entry.insert("file".to_string(), Value::String(node.file));
    Value::Object(entry)
}

/// Convert a TOML value into its JSON equivalent
pub fn toml_to_json_value(value: toml::Value) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
