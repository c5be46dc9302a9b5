//! Build orchestration for the Remix build pipeline
//!
//! Resolves configuration, triggers the external bundler through a
//! [`BuildTrigger`], assembles the [`BuildManifest`](remix_routes::BuildManifest)
//! and hands both to the `buildEnd` hook.

pub mod error;
pub mod orchestrator;
pub mod payload;
pub mod trigger;

pub use error::{Error, Result};
pub use orchestrator::{BuildOrchestrator, build};
pub use payload::WriteBuildEndPayload;
pub use trigger::{BuildRequest, BuildStatus, BuildTrigger, ProcessBuildTrigger, PORT_ENV, TARGET_ENV};
