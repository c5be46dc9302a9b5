//! Route tree model and server bundle manifest builder
//!
//! This crate owns the route side of a build:
//!
//! - **Route tree**: validated parent-linked [`RouteNode`]s with a single root
//! - **Route filtering**: `ignoredRouteFiles` glob matching
//! - **Manifest building**: assignment of addressable routes to server bundles
//!
//! # Example
//!
//! ```ignore
//! use remix_routes::{ManifestBuilder, RouteNode, RouteTree, ServerBundlesArgs};
//!
//! let routes = RouteTree::from_nodes([
//!     RouteNode::new("root", "app/root.tsx"),
//!     RouteNode::new("routes/_index", "app/routes/_index.tsx").with_parent("root").as_index(),
//! ])?;
//! let bundles = |_: &ServerBundlesArgs<'_>| "bundle-1".to_string();
//! let manifest = ManifestBuilder::new("build", "index.js")
//!     .build(&routes, Some(&bundles))
//!     .await?;
//! ```

pub mod error;
pub mod manifest;
pub mod route;

pub use error::{BoxError, Error, Result};
pub use manifest::{
    BuildManifest, DEFAULT_SERVER_BUNDLE_ID, ManifestBuilder, ServerBundle, ServerBundles,
    ServerBundlesArgs,
};
pub use route::{RouteNode, RouteTree};
