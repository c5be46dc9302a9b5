//! Preset hook invocation and configuration resolution
//!
//! Resolution runs in a fixed order:
//!
//! 1. Each preset's `remixConfig` hook, one at a time, in list order. Each
//!    sees the accumulation of every earlier preset and its patch is merged
//!    before the next preset runs.
//! 2. The user's own patch, merged last.
//! 3. [`freeze`] into a [`ResolvedConfig`].
//! 4. Each preset's `remixConfigResolved` hook, in list order, all observing
//!    the same frozen instance.
//!
//! Any hook failure aborts resolution; no partial configuration escapes.

use std::sync::Arc;

use remix_routes::RouteTree;
use tracing::Instrument;

use crate::error::{Error, HookName, Result};
use crate::merge::{AccumulatedConfig, resolve_precedence};
use crate::preset::{RemixConfigArgs, RemixConfigResolvedArgs};
use crate::resolved::{ResolvedConfig, freeze};
use crate::user::UserConfig;

/// Resolves a [`UserConfig`] and its presets into a [`ResolvedConfig`]
pub struct ConfigResolver {
    user: UserConfig,
    routes: Option<RouteTree>,
}

impl ConfigResolver {
    pub fn new(user: UserConfig) -> Self {
        Self { user, routes: None }
    }

    /// Set the route tree produced by route discovery
    pub fn with_routes(mut self, routes: RouteTree) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Run both hook passes and produce the frozen configuration
    pub async fn resolve(self) -> Result<Arc<ResolvedConfig>> {
        let Self { user, routes } = self;
        let UserConfig { presets, patch } = user;

        let mut accumulated = AccumulatedConfig::new();
        for preset in &presets {
            let span = tracing::debug_span!("remix_config", preset = preset.name());
            let contributed = preset
                .remix_config(RemixConfigArgs {
                    remix_config: &accumulated,
                })
                .instrument(span)
                .await
                .map_err(|source| Error::PresetHook {
                    preset: preset.name().to_string(),
                    hook: HookName::RemixConfig,
                    source,
                })?;

            match contributed {
                Some(patch) => {
                    tracing::debug!(
                        preset = preset.name(),
                        keys = ?patch.keys().collect::<Vec<_>>(),
                        "Merging preset config"
                    );
                    accumulated = accumulated.merge(patch);
                }
                None => tracing::debug!(preset = preset.name(), "Preset contributed no config"),
            }
        }

        let accumulated = resolve_precedence(accumulated, patch);
        let resolved = freeze(accumulated, routes.as_ref())?;

        for preset in &presets {
            let span = tracing::debug_span!("remix_config_resolved", preset = preset.name());
            preset
                .remix_config_resolved(RemixConfigResolvedArgs {
                    remix_config: &resolved,
                })
                .instrument(span)
                .await
                .map_err(|source| Error::PresetHook {
                    preset: preset.name().to_string(),
                    hook: HookName::RemixConfigResolved,
                    source,
                })?;
        }

        tracing::debug!(presets = presets.len(), "Resolved config");
        Ok(resolved)
    }
}
