//! Folding patches into the accumulated configuration
//!
//! Merge semantics are deliberately shallow:
//! - Keys: last writer wins
//! - Arrays and objects: REPLACE (no concatenation, no recursive merge)
//! - Keys on the deny list: dropped

use std::collections::BTreeMap;

use serde_json::Value;

use crate::key::ConfigKey;
use crate::patch::ConfigPatch;
use crate::value::ConfigValue;

/// Configuration accumulated so far during resolution
///
/// Presets receive this read-only. It never contains a denied key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulatedConfig {
    entries: BTreeMap<ConfigKey, ConfigValue>,
}

impl AccumulatedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one patch into the accumulator
    pub fn merge(mut self, patch: ConfigPatch) -> Self {
        for (key, value) in patch {
            if key.is_merge_denied() {
                tracing::warn!(%key, "Dropping denied key from config patch");
                continue;
            }
            self.entries.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: ConfigKey) -> Option<&ConfigValue> {
        self.entries.get(&key)
    }

    /// The JSON data under a key, if it holds data
    pub fn data(&self, key: ConfigKey) -> Option<&Value> {
        self.get(key).and_then(ConfigValue::as_data)
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

    pub(crate) fn take(&mut self, key: ConfigKey) -> Option<ConfigValue> {
        self.entries.remove(&key)
    }
}

/// Apply the user's configuration on top of everything presets contributed
///
/// The user patch is merged last, so it wins every key it sets.
pub fn resolve_precedence(accumulated: AccumulatedConfig, user: ConfigPatch) -> AccumulatedConfig {
    accumulated.merge(user)
}

/// Fold a sequence of patches, first to last
pub fn merge_patches(patches: impl IntoIterator<Item = ConfigPatch>) -> AccumulatedConfig {
    patches
        .into_iter()
        .fold(AccumulatedConfig::new(), AccumulatedConfig::merge)
}
