//! Error types for remix-routes

use std::path::PathBuf;

/// Boxed error returned by user-supplied route callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for route operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating route trees or building manifests
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two route nodes share the same id
    #[error("Duplicate route id: {id}")]
    DuplicateRoute { id: String },

    /// A route names a parent that is not in the tree
    #[error("Route {id} references missing parent {parent_id}")]
    MissingParent { id: String, parent_id: String },

    /// The tree has no root route
    #[error("Route tree has no root route")]
    MissingRoot,

    /// More than one route has no parent
    #[error("Route tree has multiple root routes: {ids:?}")]
    MultipleRoots { ids: Vec<String> },

    /// Parent links loop back on themselves
    #[error("Route {id} is part of a parent cycle")]
    RouteCycle { id: String },

    /// A route id was looked up but does not exist
    #[error("Route not found: {id}")]
    RouteNotFound { id: String },

    /// A `serverBundles` function returned an id that cannot be used as a directory name
    #[error(
        "Invalid server bundle id {bundle_id:?} for route {route_id}: \
         only alphanumeric characters, hyphens and underscores are allowed"
    )]
    InvalidServerBundleId { route_id: String, bundle_id: String },

    /// A `serverBundles` function failed for a route
    #[error("serverBundles failed for route {route_id}: {source}")]
    ServerBundlesFailed {
        route_id: String,
        #[source]
        source: BoxError,
    },

    /// An `ignoredRouteFiles` pattern is not a valid glob
    #[error("Invalid ignored route file pattern {pattern:?}: {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Route tree file could not be read
    #[error("Failed to read route tree at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Route tree JSON is malformed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
