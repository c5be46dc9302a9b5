//! Named preset registry
//!
//! Config files refer to presets by name. This module provides the registry
//! that maps those names to preset implementations.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::preset::Preset;
use crate::presets::TopLevelBundlesPreset;

/// Registry mapping preset names to preset implementations.
///
/// # Example
///
/// ```
/// use remix_config::PresetRegistry;
///
/// let registry = PresetRegistry::with_builtins();
/// assert!(registry.contains("server-bundles:top-level"));
/// ```
#[derive(Clone, Default)]
pub struct PresetRegistry {
    presets: HashMap<String, Arc<dyn Preset>>,
}

impl PresetRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with built-in presets registered.
    ///
    /// Currently registers:
    /// - `server-bundles:top-level`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TopLevelBundlesPreset));
        registry
    }

    /// Register a preset under its own name.
    ///
    /// If a preset with the same name was already registered, it is
    /// replaced.
    pub fn register(&mut self, preset: Arc<dyn Preset>) {
        self.presets.insert(preset.name().to_string(), preset);
    }

    /// Look up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] if no preset is registered under
    /// `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Preset>> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownPreset {
                name: name.to_string(),
            })
    }

    /// Resolve an ordered list of names, preserving order.
    pub fn resolve_all<I, S>(&self, names: I) -> Result<Vec<Arc<dyn Preset>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| self.get(name.as_ref())).collect()
    }

    /// Check if a preset is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// List all registered preset names.
    ///
    /// # Returns
    ///
    /// A sorted vector of preset names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.presets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl std::fmt::Debug for PresetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetRegistry")
            .field("presets", &self.names())
            .finish()
    }
}
