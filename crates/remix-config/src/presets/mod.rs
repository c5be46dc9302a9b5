//! Built-in presets and the name registry used by config files

mod registry;
mod static_patch;
mod top_level;

pub use registry::PresetRegistry;
pub use static_patch::StaticPreset;
pub use top_level::{ROOT_BUNDLE_ID, TopLevelBundlesPreset, top_level_bundle_id};
