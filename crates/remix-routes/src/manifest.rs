//! Build manifest and server bundle assignment
//!
//! After the bundler has run, every addressable route is assigned to a server bundle
//! by the configured `serverBundles` function. Routes that share an id share a
//! bundle. Without a function, all routes land in one default bundle.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;

use crate::error::{BoxError, Error, Result};
use crate::route::{RouteNode, RouteTree};

/// Bundle id used when no `serverBundles` function is configured
pub const DEFAULT_SERVER_BUNDLE_ID: &str = "index";

static BUNDLE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap_or_else(|e| panic!("invalid bundle id regex: {e}"))
});

/// Arguments passed to a `serverBundles` function
#[derive(Debug, Clone, Serialize)]
pub struct ServerBundlesArgs<'a> {
    /// The route being assigned
    pub route: &'a RouteNode,
    /// Routes from the root down to (and including) `route`
    pub branch: Vec<&'a RouteNode>,
}

/// Maps a route to the server bundle that should contain it
///
/// Implementations must be deterministic: the same route must always map to
/// the same id for the manifest to be reproducible.
#[async_trait]
pub trait ServerBundles: Send + Sync {
    async fn server_bundle_id(&self, args: &ServerBundlesArgs<'_>) -> std::result::Result<String, BoxError>;
}

#[async_trait]
impl<F> ServerBundles for F
where
    F: Fn(&ServerBundlesArgs<'_>) -> String + Send + Sync,
{
    async fn server_bundle_id(&self, args: &ServerBundlesArgs<'_>) -> std::result::Result<String, BoxError> {
        Ok(self(args))
    }
}

/// One server bundle in the build manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerBundle {
    pub id: String,
    pub file: String,
}

/// Route tree plus server bundle assignments, handed to `buildEnd`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    pub route_id_to_server_bundle_id: BTreeMap<String, String>,
    pub routes: RouteTree,
    pub server_bundles: BTreeMap<String, ServerBundle>,
}

impl BuildManifest {
    /// Bundle id assigned to a route, if any
    pub fn bundle_for(&self, route_id: &str) -> Option<&ServerBundle> {
        self.route_id_to_server_bundle_id
            .get(route_id)
            .and_then(|bundle_id| self.server_bundles.get(bundle_id))
    }
}

/// Computes a [`BuildManifest`] from a route tree
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    build_directory: String,
    server_build_file: String,
}

impl ManifestBuilder {
    pub fn new(build_directory: impl Into<String>, server_build_file: impl Into<String>) -> Self {
        Self {
            build_directory: build_directory.into(),
            server_build_file: server_build_file.into(),
        }
    }

    /// Output file for a named bundle: `<build>/server/<id>/<file>`
    pub fn bundle_file(&self, bundle_id: &str) -> String {
        format!(
            "{}/server/{}/{}",
            self.build_directory.trim_end_matches('/'),
            bundle_id,
            self.server_build_file
        )
    }

    /// Output file for the default bundle: `<build>/server/<file>`
    pub fn default_bundle_file(&self) -> String {
        format!(
            "{}/server/{}",
            self.build_directory.trim_end_matches('/'),
            self.server_build_file
        )
    }

    /// Assign every addressable route to a server bundle
    ///
    /// Routes are visited in id order and `server_bundles` is called exactly
    /// once per assigned route.
    pub async fn build(
        &self,
        routes: &RouteTree,
        server_bundles: Option<&dyn ServerBundles>,
    ) -> Result<BuildManifest> {
        let mut route_id_to_server_bundle_id = BTreeMap::new();
        let mut bundles = BTreeMap::new();

        let Some(server_bundles) = server_bundles else {
            for route in assignable(routes) {
                route_id_to_server_bundle_id
                    .insert(route.id.clone(), DEFAULT_SERVER_BUNDLE_ID.to_string());
            }
            bundles.insert(
                DEFAULT_SERVER_BUNDLE_ID.to_string(),
                ServerBundle {
                    id: DEFAULT_SERVER_BUNDLE_ID.to_string(),
                    file: self.default_bundle_file(),
                },
            );
            tracing::debug!(
                routes = route_id_to_server_bundle_id.len(),
                "No serverBundles function, using default bundle"
            );
            return Ok(BuildManifest {
                route_id_to_server_bundle_id,
                routes: routes.clone(),
                server_bundles: bundles,
            });
        };

        for route in assignable(routes) {
            let args = ServerBundlesArgs {
                route,
                branch: routes.branch(&route.id)?,
            };
            let bundle_id = server_bundles
                .server_bundle_id(&args)
                .await
                .map_err(|source| Error::ServerBundlesFailed {
                    route_id: route.id.clone(),
                    source,
                })?;

            if !BUNDLE_ID_PATTERN.is_match(&bundle_id) {
                return Err(Error::InvalidServerBundleId {
                    route_id: route.id.clone(),
                    bundle_id,
                });
            }

            tracing::debug!(route = %route.id, bundle = %bundle_id, "Assigned server bundle");
            bundles
                .entry(bundle_id.clone())
                .or_insert_with(|| ServerBundle {
                    id: bundle_id.clone(),
                    file: self.bundle_file(&bundle_id),
                });
            route_id_to_server_bundle_id.insert(route.id.clone(), bundle_id);
        }

        Ok(BuildManifest {
            route_id_to_server_bundle_id,
            routes: routes.clone(),
            server_bundles: bundles,
        })
    }
}

/// Routes that render at a URL of their own
///
/// Pathless routes (the root and pathless layouts) are skipped, and so is
/// any route whose URL is rendered by an index child instead.
fn assignable(routes: &RouteTree) -> impl Iterator<Item = &RouteNode> {
    routes.iter().filter(|route| {
        !route.is_root()
            && (route.index || route.path.is_some())
            && !routes.has_index_child(&route.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index_tree() -> RouteTree {
        RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("routes/_index", "app/routes/_index.tsx")
                .with_parent("root")
                .as_index(),
        ])
        .unwrap()
    }

    #[test]
    fn test_bundle_file_paths() {
        let builder = ManifestBuilder::new("build/", "index.js");
        assert_eq!(builder.bundle_file("bundle-1"), "build/server/bundle-1/index.js");
        assert_eq!(builder.default_bundle_file(), "build/server/index.js");
    }

    #[tokio::test]
    async fn test_single_index_route_single_bundle() {
        let builder = ManifestBuilder::new("build", "index.js");
        let bundles = |_: &ServerBundlesArgs<'_>| "bundle-1".to_string();
        let manifest = builder.build(&index_tree(), Some(&bundles)).await.unwrap();

        assert_eq!(
            manifest.route_id_to_server_bundle_id,
            BTreeMap::from([("routes/_index".to_string(), "bundle-1".to_string())])
        );
        assert_eq!(manifest.server_bundles.len(), 1);
        assert_eq!(
            manifest.server_bundles["bundle-1"],
            ServerBundle {
                id: "bundle-1".to_string(),
                file: "build/server/bundle-1/index.js".to_string(),
            }
        );
        assert_eq!(manifest.routes, index_tree());
    }

    #[tokio::test]
    async fn test_default_bundle_when_function_absent() {
        let builder = ManifestBuilder::new("build", "index.js");
        let manifest = builder.build(&index_tree(), None).await.unwrap();
        assert_eq!(
            manifest.bundle_for("routes/_index").map(|b| b.file.as_str()),
            Some("build/server/index.js")
        );
        assert!(!manifest.route_id_to_server_bundle_id.contains_key("root"));
    }

    #[tokio::test]
    async fn test_pathless_leaf_not_assigned() {
        let tree = RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("routes/_index", "app/routes/_index.tsx")
                .with_parent("root")
                .as_index(),
            RouteNode::new("routes/_auth", "app/routes/_auth.tsx").with_parent("root"),
        ])
        .unwrap();
        let calls = std::sync::Mutex::new(Vec::new());
        let bundles = |args: &ServerBundlesArgs<'_>| {
            calls.lock().unwrap().push(args.route.id.clone());
            "b".to_string()
        };

        let manifest = ManifestBuilder::new("build", "index.js")
            .build(&tree, Some(&bundles))
            .await
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["routes/_index"]);
        assert!(!manifest.route_id_to_server_bundle_id.contains_key("routes/_auth"));
    }

    #[tokio::test]
    async fn test_invalid_bundle_id_rejected() {
        let builder = ManifestBuilder::new("build", "index.js");
        let bundles = |_: &ServerBundlesArgs<'_>| "../escape".to_string();
        let err = builder.build(&index_tree(), Some(&bundles)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidServerBundleId { .. }));
    }

    #[tokio::test]
    async fn test_branch_passed_root_first() {
        let builder = ManifestBuilder::new("build", "index.js");
        let bundles = |args: &ServerBundlesArgs<'_>| {
            assert_eq!(args.branch.first().map(|r| r.id.as_str()), Some("root"));
            assert_eq!(args.branch.last().map(|r| r.id.as_str()), Some(args.route.id.as_str()));
            "b".to_string()
        };
        builder.build(&index_tree(), Some(&bundles)).await.unwrap();
    }
}
