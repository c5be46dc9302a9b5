//! Preset and `buildEnd` hook contracts

use std::sync::Arc;

use async_trait::async_trait;
use remix_routes::BuildManifest;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::BoxError;
use crate::merge::AccumulatedConfig;
use crate::patch::ConfigPatch;
use crate::resolved::ResolvedConfig;

/// Argument of the `remixConfig` hook
#[derive(Debug, Clone, Copy)]
pub struct RemixConfigArgs<'a> {
    /// Everything contributed by earlier presets
    pub remix_config: &'a AccumulatedConfig,
}

/// Argument of the `remixConfigResolved` hook
#[derive(Debug, Clone, Copy)]
pub struct RemixConfigResolvedArgs<'a> {
    /// The frozen configuration shared by every later stage
    pub remix_config: &'a Arc<ResolvedConfig>,
}

/// A composable contributor of configuration
///
/// Both hooks are optional. Presets run strictly one after another, in the
/// order they were listed, and each sees what earlier presets contributed.
#[async_trait]
pub trait Preset: Send + Sync {
    fn name(&self) -> &str;

    /// Contribute a partial configuration; `None` contributes nothing
    async fn remix_config(
        &self,
        _args: RemixConfigArgs<'_>,
    ) -> Result<Option<ConfigPatch>, BoxError> {
        Ok(None)
    }

    /// Inspect the final configuration; an error aborts the build
    async fn remix_config_resolved(
        &self,
        _args: RemixConfigResolvedArgs<'_>,
    ) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Payload of the terminal `buildEnd` hook
#[derive(Debug, Clone, Copy)]
pub struct BuildEndArgs<'a> {
    pub build_manifest: &'a BuildManifest,
    pub remix_config: &'a Arc<ResolvedConfig>,
}

impl Serialize for BuildEndArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BuildEndArgs", 2)?;
        state.serialize_field("buildManifest", self.build_manifest)?;
        state.serialize_field("remixConfig", self.remix_config.as_ref())?;
        state.end()
    }
}

/// Called once after a successful build with the assembled artifacts
#[async_trait]
pub trait BuildEndHook: Send + Sync {
    async fn build_end(&self, args: &BuildEndArgs<'_>) -> Result<(), BoxError>;
}

#[async_trait]
impl<F> BuildEndHook for F
where
    F: Fn(&BuildEndArgs<'_>) -> Result<(), BoxError> + Send + Sync,
{
    async fn build_end(&self, args: &BuildEndArgs<'_>) -> Result<(), BoxError> {
        self(args)
    }
}
