//! Route nodes and the validated route tree
//!
//! The route tree is produced by file-system route discovery, which lives
//! outside this crate. It arrives here as a flat list of [`RouteNode`]s linked
//! by `parentId` and is validated into a [`RouteTree`] with exactly one root.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single entry in the route tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    /// Unique route id, e.g. `root` or `routes/_index`
    pub id: String,

    /// Id of the parent route; `None` only for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// URL path segment contributed by this route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Whether this is an index route of its parent
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,

    /// Source file backing the route
    pub file: String,
}

impl RouteNode {
    pub fn new(id: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            path: None,
            index: false,
            file: file.into(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn as_index(mut self) -> Self {
        self.index = true;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Accepts either the list form emitted by discovery or an id-keyed map
#[derive(Deserialize)]
#[serde(untagged)]
enum RouteTreeInput {
    List(Vec<RouteNode>),
    Map(BTreeMap<String, RouteNode>),
}

/// A validated route tree keyed by route id
///
/// Iteration is always in route-id order so that everything derived from
/// the tree is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTree {
    routes: BTreeMap<String, RouteNode>,
}

impl RouteTree {
    /// Validate a list of nodes into a tree
    ///
    /// Fails on duplicate ids, dangling parent references, cycles, and on
    /// anything other than exactly one root.
    pub fn from_nodes(nodes: impl IntoIterator<Item = RouteNode>) -> Result<Self> {
        let mut routes = BTreeMap::new();
        for node in nodes {
            if routes.contains_key(&node.id) {
                return Err(Error::DuplicateRoute { id: node.id });
            }
            routes.insert(node.id.clone(), node);
        }

        let tree = Self { routes };
        tree.validate()?;
        Ok(tree)
    }

    /// Parse the route-tree collaborator output
    pub fn from_json_str(content: &str) -> Result<Self> {
        let nodes = match serde_json::from_str::<RouteTreeInput>(content)? {
            RouteTreeInput::List(list) => list,
            RouteTreeInput::Map(map) => map.into_values().collect(),
        };
        Self::from_nodes(nodes)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<()> {
        let roots: Vec<String> = self
            .routes
            .values()
            .filter(|r| r.is_root())
            .map(|r| r.id.clone())
            .collect();
        match roots.len() {
            0 => return Err(Error::MissingRoot),
            1 => {}
            _ => return Err(Error::MultipleRoots { ids: roots }),
        }

        for route in self.routes.values() {
            if let Some(parent_id) = &route.parent_id
                && !self.routes.contains_key(parent_id)
            {
                return Err(Error::MissingParent {
                    id: route.id.clone(),
                    parent_id: parent_id.clone(),
                });
            }
        }

        // With a single root and no dangling parents, any chain longer than
        // the tree itself must be looping.
        for route in self.routes.values() {
            let mut current = route;
            let mut steps = 0;
            while let Some(parent_id) = &current.parent_id {
                steps += 1;
                if steps > self.routes.len() {
                    return Err(Error::RouteCycle {
                        id: route.id.clone(),
                    });
                }
                current = &self.routes[parent_id];
            }
        }

        Ok(())
    }

    /// The root route
    pub fn root(&self) -> &RouteNode {
        // validate() guarantees exactly one root
        self.routes
            .values()
            .find(|r| r.is_root())
            .unwrap_or_else(|| unreachable!("validated route tree has a root"))
    }

    pub fn get(&self, id: &str) -> Option<&RouteNode> {
        self.routes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.routes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Number of routes, root included; never zero
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always `false`: a validated tree contains at least its root
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Direct children of a route, in id order
    pub fn children(&self, id: &str) -> Vec<&RouteNode> {
        self.routes
            .values()
            .filter(|r| r.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Whether a route has no children
    pub fn is_leaf(&self, id: &str) -> bool {
        !self
            .routes
            .values()
            .any(|r| r.parent_id.as_deref() == Some(id))
    }

    /// Whether a route has an index child rendering at its own URL
    pub fn has_index_child(&self, id: &str) -> bool {
        self.routes
            .values()
            .any(|r| r.index && r.parent_id.as_deref() == Some(id))
    }

    /// The chain of routes from the root down to `id`, inclusive
    pub fn branch(&self, id: &str) -> Result<Vec<&RouteNode>> {
        let mut current = self
            .routes
            .get(id)
            .ok_or_else(|| Error::RouteNotFound { id: id.to_string() })?;
        let mut branch = vec![current];
        while let Some(parent_id) = &current.parent_id {
            current = &self.routes[parent_id];
            branch.push(current);
        }
        branch.reverse();
        Ok(branch)
    }

    /// Drop routes whose file matches any of the given globs
    ///
    /// Files are matched relative to `app_directory`. The root route is never
    /// dropped; descendants of a dropped route are dropped with it.
    pub fn without_ignored(&self, app_directory: &str, patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(self.clone());
        }

        let globs = build_globset(patterns)?;
        let ignored: BTreeSet<&str> = self
            .routes
            .values()
            .filter(|r| !r.is_root() && globs.is_match(relative_to(&r.file, app_directory)))
            .map(|r| r.id.as_str())
            .collect();

        let mut kept = BTreeMap::new();
        for route in self.routes.values() {
            let branch = self.branch(&route.id)?;
            if branch.iter().any(|r| ignored.contains(r.id.as_str())) {
                tracing::debug!(route = %route.id, file = %route.file, "Ignoring route file");
                continue;
            }
            kept.insert(route.id.clone(), route.clone());
        }

        Ok(Self { routes: kept })
    }

    /// Add routes on top of this tree and re-validate
    ///
    /// An added node with an existing id replaces the discovered one.
    pub fn extend(&self, nodes: impl IntoIterator<Item = RouteNode>) -> Result<Self> {
        let mut routes = self.routes.clone();
        for node in nodes {
            routes.insert(node.id.clone(), node);
        }
        let tree = Self { routes };
        tree.validate()?;
        Ok(tree)
    }

    pub fn into_nodes(self) -> Vec<RouteNode> {
        self.routes.into_values().collect()
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::InvalidGlob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::InvalidGlob {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

fn relative_to<'a>(file: &'a str, app_directory: &str) -> &'a str {
    let file = file.strip_prefix("./").unwrap_or(file);
    let dir = app_directory.trim_start_matches("./").trim_end_matches('/');
    if dir.is_empty() {
        return file;
    }
    file.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RouteTree {
        RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("routes/_index", "app/routes/_index.tsx")
                .with_parent("root")
                .as_index(),
            RouteNode::new("routes/admin", "app/routes/admin.tsx")
                .with_parent("root")
                .with_path("admin"),
            RouteNode::new("routes/admin.users", "app/routes/admin.users.tsx")
                .with_parent("routes/admin")
                .with_path("users"),
        ])
        .unwrap()
    }

    #[test]
    fn test_root_and_children() {
        let tree = sample();
        assert_eq!(tree.root().id, "root");
        let children: Vec<_> = tree.children("root").into_iter().map(|r| r.id.as_str()).collect();
        assert_eq!(children, vec!["routes/_index", "routes/admin"]);
        assert!(tree.is_leaf("routes/_index"));
        assert!(!tree.is_leaf("routes/admin"));
        assert!(tree.has_index_child("root"));
        assert!(!tree.has_index_child("routes/admin"));
    }

    #[test]
    fn test_validated_tree_is_never_empty() {
        let root_only = RouteTree::from_nodes([RouteNode::new("root", "app/root.tsx")]).unwrap();
        assert_eq!(root_only.len(), 1);
        assert!(!root_only.is_empty());

        let filtered = sample().without_ignored("app", &["**/*".to_string()]).unwrap();
        assert!(!filtered.is_empty());
    }

    #[test]
    fn test_branch_is_root_first() {
        let tree = sample();
        let branch: Vec<_> = tree
            .branch("routes/admin.users")
            .unwrap()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(branch, vec!["root", "routes/admin", "routes/admin.users"]);
    }

    #[test]
    fn test_branch_unknown_route() {
        let err = sample().branch("nope").unwrap_err();
        assert!(matches!(err, Error::RouteNotFound { .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("root", "app/other.tsx"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateRoute { id } if id == "root"));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let err = RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("routes/a", "app/routes/a.tsx").with_parent("routes/ghost"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::MissingParent { .. }));
    }

    #[test]
    fn test_root_count_enforced() {
        let none = RouteTree::from_nodes(Vec::new()).unwrap_err();
        assert!(matches!(none, Error::MissingRoot));

        let two = RouteTree::from_nodes([
            RouteNode::new("a", "app/a.tsx"),
            RouteNode::new("b", "app/b.tsx"),
        ])
        .unwrap_err();
        assert!(matches!(two, Error::MultipleRoots { ids } if ids == vec!["a", "b"]));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("a", "app/a.tsx").with_parent("b"),
            RouteNode::new("b", "app/b.tsx").with_parent("a"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::RouteCycle { .. }));
    }

    #[test]
    fn test_json_list_and_map_forms() {
        let list = r#"[
            {"id": "root", "file": "app/root.tsx"},
            {"id": "routes/_index", "parentId": "root", "index": true, "file": "app/routes/_index.tsx"}
        ]"#;
        let map = r#"{
            "root": {"id": "root", "file": "app/root.tsx"},
            "routes/_index": {"id": "routes/_index", "parentId": "root", "index": true, "file": "app/routes/_index.tsx"}
        }"#;
        assert_eq!(
            RouteTree::from_json_str(list).unwrap(),
            RouteTree::from_json_str(map).unwrap()
        );
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let node = RouteNode::new("root", "app/root.tsx");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"id": "root", "file": "app/root.tsx"}));
    }

    #[test]
    fn test_without_ignored_drops_descendants() {
        let tree = sample();
        let filtered = tree
            .without_ignored("app", &["routes/admin.tsx".to_string()])
            .unwrap();
        let ids: Vec<_> = filtered.ids().collect();
        assert_eq!(ids, vec!["root", "routes/_index"]);
    }

    #[test]
    fn test_without_ignored_never_drops_root() {
        let tree = sample();
        let filtered = tree.without_ignored("app", &["**/*".to_string()]).unwrap();
        let ids: Vec<_> = filtered.ids().collect();
        assert_eq!(ids, vec!["root"]);
    }

    #[test]
    fn test_invalid_glob() {
        let err = sample()
            .without_ignored("app", &["a[".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGlob { .. }));
    }

    #[test]
    fn test_relative_to_app_directory() {
        assert_eq!(relative_to("app/routes/a.tsx", "app"), "routes/a.tsx");
        assert_eq!(relative_to("./app/routes/a.tsx", "./app/"), "routes/a.tsx");
        assert_eq!(relative_to("routes/a.tsx", "app"), "routes/a.tsx");
        assert_eq!(relative_to("application/a.tsx", "app"), "application/a.tsx");
    }

    #[test]
    fn test_extend_replaces_and_validates() {
        let tree = sample();
        let extended = tree
            .extend([RouteNode::new("routes/extra", "app/extra.tsx").with_parent("root")])
            .unwrap();
        assert_eq!(extended.len(), tree.len() + 1);

        let err = tree
            .extend([RouteNode::new("routes/bad", "app/bad.tsx").with_parent("missing")])
            .unwrap_err();
        assert!(matches!(err, Error::MissingParent { .. }));
    }
}
