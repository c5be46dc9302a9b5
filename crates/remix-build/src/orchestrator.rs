//! Build sequencing
//!
//! A build runs strictly in this order:
//!
//! 1. Resolve configuration (presets, user config, freeze, resolved hooks)
//! 2. Trigger the external bundler and wait for it
//! 3. Assemble the build manifest from the route tree
//! 4. Call `buildEnd` once with the manifest and the resolved config
//!
//! A failure at any step stops the build; `buildEnd` only ever sees a
//! successful build.

use std::sync::Arc;

use remix_config::{BuildEndArgs, ConfigResolver, ResolvedConfig, UserConfig};
use remix_routes::{BuildManifest, ManifestBuilder, RouteTree};

use crate::error::{Error, Result};
use crate::trigger::{BuildRequest, BuildTrigger};

/// Drives one build against a [`BuildTrigger`]
pub struct BuildOrchestrator<T> {
    trigger: T,
    request: BuildRequest,
}

impl<T: BuildTrigger> BuildOrchestrator<T> {
    pub fn new(trigger: T, request: BuildRequest) -> Self {
        Self { trigger, request }
    }

    pub fn request(&self) -> &BuildRequest {
        &self.request
    }

    /// Trigger the bundler, build the manifest, then call `buildEnd`
    pub async fn run_build(
        &self,
        resolved: &Arc<ResolvedConfig>,
        routes: &RouteTree,
    ) -> Result<BuildManifest> {
        tracing::info!(cwd = %self.request.cwd.display(), "Starting build");
        let status = self.trigger.trigger(&self.request).await?;
        if !status.is_success() {
            tracing::debug!(exit_code = ?status.exit_code, "Build command failed");
            return Err(Error::BuildTriggerFailed {
                exit_code: status.exit_code,
                stderr: status.stderr,
            });
        }

        let manifest = ManifestBuilder::new(resolved.build_directory(), resolved.server_build_file())
            .build(routes, resolved.server_bundles())
            .await?;
        tracing::info!(
            routes = manifest.routes.len(),
            bundles = manifest.server_bundles.len(),
            "Build finished"
        );

        if let Some(hook) = resolved.build_end() {
            let args = BuildEndArgs {
                build_manifest: &manifest,
                remix_config: resolved,
            };
            hook.build_end(&args)
                .await
                .map_err(|source| Error::BuildEndFailed { source })?;
        }

        Ok(manifest)
    }
}

/// Resolve configuration and run a full build
///
/// The bundler is never started when resolution fails. The manifest is
/// built from the resolved route tree, which already has
/// `ignoredRouteFiles` removed and config-declared routes added.
pub async fn build<T: BuildTrigger>(
    user: UserConfig,
    discovered_routes: Option<RouteTree>,
    trigger: T,
    request: BuildRequest,
) -> Result<BuildManifest> {
    let mut resolver = ConfigResolver::new(user);
    if let Some(routes) = discovered_routes {
        resolver = resolver.with_routes(routes);
    }
    let resolved = resolver.resolve().await?;

    BuildOrchestrator::new(trigger, request)
        .run_build(&resolved, resolved.routes())
        .await
}
