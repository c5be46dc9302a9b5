use async_trait::async_trait;
use remix_routes::ServerBundlesArgs;

use crate::error::BoxError;
use crate::patch::ConfigPatch;
use crate::preset::{Preset, RemixConfigArgs};

/// Bundle id for routes that do not sit under a top-level path segment
pub const ROOT_BUNDLE_ID: &str = "root";

/// Splits the server build by top-level URL segment
///
/// A route lands in the bundle named after the first path segment of the
/// first route below the root in its branch. Index routes of the root and
/// pathless layouts land in `root`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopLevelBundlesPreset;

impl TopLevelBundlesPreset {
    pub const NAME: &'static str = "server-bundles:top-level";
}

#[async_trait]
impl Preset for TopLevelBundlesPreset {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn remix_config(
        &self,
        _args: RemixConfigArgs<'_>,
    ) -> Result<Option<ConfigPatch>, BoxError> {
        Ok(Some(ConfigPatch::new().server_bundles(top_level_bundle_id)))
    }
}

/// Bundle id for a route: its top-level segment, or [`ROOT_BUNDLE_ID`]
pub fn top_level_bundle_id(args: &ServerBundlesArgs<'_>) -> String {
    let segment = args
        .branch
        .iter()
        .find(|route| !route.is_root())
        .and_then(|route| route.path.as_deref())
        .and_then(|path| path.split('/').find(|s| !s.is_empty()));

    match segment {
        Some(segment) => sanitize(segment),
        None => ROOT_BUNDLE_ID.to_string(),
    }
}

/// Replace anything outside `[A-Za-z0-9_-]` so the id is always valid
fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
