//! The frozen, resolved configuration
//!
//! [`freeze`] turns the final accumulated configuration into a typed
//! [`ResolvedConfig`]. Fields are private and only shared borrows are handed
//! out, so a resolved config cannot be changed once built. Nested data lives
//! behind [`FrozenValue`]. The runtime setters exist for untyped callers and
//! always fail.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use remix_routes::{RouteNode, RouteTree, ServerBundles};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::key::{ConfigKey, RESOLVED_KEYS};
use crate::merge::AccumulatedConfig;
use crate::preset::BuildEndHook;
use crate::value::{ConfigValue, FrozenValue};

pub const DEFAULT_APP_DIRECTORY: &str = "app";
pub const DEFAULT_BUILD_DIRECTORY: &str = "build";
pub const DEFAULT_PUBLIC_PATH: &str = "/";
pub const DEFAULT_SERVER_BUILD_FILE: &str = "index.js";

/// Placeholder used when a function-valued key is serialized
const FUNCTION_PLACEHOLDER: &str = "[function]";

/// Module format of the server build output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerModuleFormat {
    #[default]
    Esm,
    Cjs,
}

impl ServerModuleFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Esm => "esm",
            Self::Cjs => "cjs",
        }
    }
}

impl fmt::Display for ServerModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerModuleFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "esm" => Ok(Self::Esm),
            "cjs" => Ok(Self::Cjs),
            _ => Err(Error::invalid_value(
                ConfigKey::ServerModuleFormat,
                "\"esm\" or \"cjs\"",
            )),
        }
    }
}

/// Final configuration shared by resolved hooks, the orchestrator and `buildEnd`
#[derive(Clone)]
pub struct ResolvedConfig {
    app_directory: String,
    build_directory: String,
    build_end: Option<Arc<dyn BuildEndHook>>,
    future: FrozenValue,
    manifest: bool,
    public_path: String,
    routes: RouteTree,
    server_build_file: String,
    server_bundles: Option<Arc<dyn ServerBundles>>,
    server_module_format: ServerModuleFormat,
    unstable_ssr: bool,
}

impl ResolvedConfig {
    pub fn app_directory(&self) -> &str {
        &self.app_directory
    }

    pub fn build_directory(&self) -> &str {
        &self.build_directory
    }

    pub fn build_end(&self) -> Option<&dyn BuildEndHook> {
        self.build_end.as_deref()
    }

    pub fn future(&self) -> &FrozenValue {
        &self.future
    }

    /// Whether a single future flag is enabled
    pub fn future_flag(&self, name: &str) -> bool {
        self.future.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn manifest(&self) -> bool {
        self.manifest
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn routes(&self) -> &RouteTree {
        &self.routes
    }

    pub fn server_build_file(&self) -> &str {
        &self.server_build_file
    }

    pub fn server_bundles(&self) -> Option<&dyn ServerBundles> {
        self.server_bundles.as_deref()
    }

    pub fn server_module_format(&self) -> ServerModuleFormat {
        self.server_module_format
    }

    pub fn unstable_ssr(&self) -> bool {
        self.unstable_ssr
    }

    /// Resolved configs reject every mutation
    pub fn try_set(&self, path: &str, _value: Value) -> Result<()> {
        Err(Error::FrozenConfig {
            path: path.to_string(),
        })
    }

    /// The serialized form as a JSON value
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("app_directory", &self.app_directory)
            .field("build_directory", &self.build_directory)
            .field("build_end", &self.build_end.as_ref().map(|_| FUNCTION_PLACEHOLDER))
            .field("future", &self.future)
            .field("manifest", &self.manifest)
            .field("public_path", &self.public_path)
            .field("routes", &self.routes.len())
            .field("server_build_file", &self.server_build_file)
            .field(
                "server_bundles",
                &self.server_bundles.as_ref().map(|_| FUNCTION_PLACEHOLDER),
            )
            .field("server_module_format", &self.server_module_format)
            .field("unstable_ssr", &self.unstable_ssr)
            .finish()
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let function = |set: bool| set.then_some(FUNCTION_PLACEHOLDER);

        let mut map = serializer.serialize_map(Some(RESOLVED_KEYS.len()))?;
        for key in RESOLVED_KEYS {
            let name = key.as_str();
            match key {
                ConfigKey::AppDirectory => map.serialize_entry(name, &self.app_directory)?,
                ConfigKey::BuildDirectory => map.serialize_entry(name, &self.build_directory)?,
                ConfigKey::BuildEnd => {
                    map.serialize_entry(name, &function(self.build_end.is_some()))?
                }
                ConfigKey::Future => map.serialize_entry(name, &self.future)?,
                ConfigKey::Manifest => map.serialize_entry(name, &self.manifest)?,
                ConfigKey::PublicPath => map.serialize_entry(name, &self.public_path)?,
                ConfigKey::Routes => map.serialize_entry(name, &self.routes)?,
                ConfigKey::ServerBuildFile => {
                    map.serialize_entry(name, &self.server_build_file)?
                }
                ConfigKey::ServerBundles => {
                    map.serialize_entry(name, &function(self.server_bundles.is_some()))?
                }
                ConfigKey::ServerModuleFormat => {
                    map.serialize_entry(name, &self.server_module_format)?
                }
                ConfigKey::UnstableSsr => map.serialize_entry(name, &self.unstable_ssr)?,
                ConfigKey::IgnoredRouteFiles | ConfigKey::Presets => {}
            }
        }
        map.end()
    }
}

/// Produce the immutable resolved configuration
///
/// Missing keys take their defaults. `routes` is the discovered tree with
/// `ignoredRouteFiles` removed, extended by any routes the config itself
/// declares. Without a discovered tree the declared routes must form a
/// complete tree on their own.
pub fn freeze(
    mut acc: AccumulatedConfig,
    discovered: Option<&RouteTree>,
) -> Result<Arc<ResolvedConfig>> {
    let app_directory = take_string(&mut acc, ConfigKey::AppDirectory, DEFAULT_APP_DIRECTORY)?;
    let build_directory =
        take_string(&mut acc, ConfigKey::BuildDirectory, DEFAULT_BUILD_DIRECTORY)?;
    let public_path = take_string(&mut acc, ConfigKey::PublicPath, DEFAULT_PUBLIC_PATH)?;
    let server_build_file =
        take_string(&mut acc, ConfigKey::ServerBuildFile, DEFAULT_SERVER_BUILD_FILE)?;
    let manifest = take_bool(&mut acc, ConfigKey::Manifest, false)?;
    let unstable_ssr = take_bool(&mut acc, ConfigKey::UnstableSsr, true)?;

    let server_module_format = match take_data(&mut acc, ConfigKey::ServerModuleFormat)? {
        None => ServerModuleFormat::default(),
        Some(Value::String(s)) => s.parse()?,
        Some(_) => {
            return Err(Error::invalid_value(
                ConfigKey::ServerModuleFormat,
                "\"esm\" or \"cjs\"",
            ));
        }
    };

    let future = match take_data(&mut acc, ConfigKey::Future)? {
        None => Value::Object(Default::default()),
        Some(value @ Value::Object(_)) => value,
        Some(_) => return Err(Error::invalid_value(ConfigKey::Future, "a table of flags")),
    };

    let ignored = take_string_list(&mut acc, ConfigKey::IgnoredRouteFiles)?;
    let declared = take_routes(&mut acc)?;
    let routes = match discovered {
        Some(tree) => tree
            .without_ignored(&app_directory, &ignored)?
            .extend(declared)?,
        None => RouteTree::from_nodes(declared)?,
    };

    let server_bundles = match acc.take(ConfigKey::ServerBundles) {
        None => None,
        Some(ConfigValue::ServerBundles(f)) => Some(f),
        Some(other) => return Err(wrong_kind(ConfigKey::ServerBundles, &other)),
    };
    let build_end = match acc.take(ConfigKey::BuildEnd) {
        None => None,
        Some(ConfigValue::BuildEnd(f)) => Some(f),
        Some(other) => return Err(wrong_kind(ConfigKey::BuildEnd, &other)),
    };

    tracing::debug!(
        %app_directory,
        %build_directory,
        routes = routes.len(),
        "Froze resolved config"
    );

    Ok(Arc::new(ResolvedConfig {
        app_directory,
        build_directory,
        build_end,
        future: FrozenValue::new(future),
        manifest,
        public_path,
        routes,
        server_build_file,
        server_bundles,
        server_module_format,
        unstable_ssr,
    }))
}

fn wrong_kind(key: ConfigKey, found: &ConfigValue) -> Error {
    let expected = match key {
        ConfigKey::ServerBundles => "a serverBundles function",
        ConfigKey::BuildEnd => "a buildEnd function",
        _ => "data",
    };
    Error::InvalidConfigValue {
        key: key.to_string(),
        expected: format!("{expected}, found {}", found.kind()),
    }
}

fn take_data(acc: &mut AccumulatedConfig, key: ConfigKey) -> Result<Option<Value>> {
    match acc.take(key) {
        None => Ok(None),
        Some(ConfigValue::Data(value)) => Ok(Some(value)),
        Some(other) => Err(wrong_kind(key, &other)),
    }
}

fn take_string(acc: &mut AccumulatedConfig, key: ConfigKey, default: &str) -> Result<String> {
    match take_data(acc, key)? {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(Error::invalid_value(key, "a string")),
    }
}

fn take_bool(acc: &mut AccumulatedConfig, key: ConfigKey, default: bool) -> Result<bool> {
    match take_data(acc, key)? {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(b),
        Some(_) => Err(Error::invalid_value(key, "a boolean")),
    }
}

fn take_string_list(acc: &mut AccumulatedConfig, key: ConfigKey) -> Result<Vec<String>> {
    match take_data(acc, key)? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(Error::invalid_value(key, "a list of strings")),
            })
            .collect(),
        Some(_) => Err(Error::invalid_value(key, "a list of strings")),
    }
}

/// Routes declared in config, either a list of nodes or a table keyed by id
fn take_routes(acc: &mut AccumulatedConfig) -> Result<Vec<RouteNode>> {
    let key = ConfigKey::Routes;
    let entries: Vec<(Option<String>, Value)> = match take_data(acc, key)? {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items.into_iter().map(|v| (None, v)).collect(),
        Some(Value::Object(map)) => map.into_iter().map(|(id, v)| (Some(id), v)).collect(),
        Some(_) => return Err(Error::invalid_value(key, "a list or table of routes")),
    };

    entries
        .into_iter()
        .map(|(id, mut value)| {
            if let (Some(id), Value::Object(fields)) = (id, &mut value) {
                fields.entry("id").or_insert(Value::String(id));
            }
            serde_json::from_value::<RouteNode>(value)
                .map_err(|e| Error::invalid_value(key, &format!("route entries ({e})")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::ConfigPatch;
    use pretty_assertions::assert_eq;
    use remix_routes::ServerBundlesArgs;
    use serde_json::json;

    fn discovered() -> RouteTree {
        RouteTree::from_nodes([
            RouteNode::new("root", "app/root.tsx"),
            RouteNode::new("routes/_index", "app/routes/_index.tsx")
                .with_parent("root")
                .as_index(),
            RouteNode::new("routes/styles", "app/routes/styles.css").with_parent("root"),
        ])
        .unwrap()
    }

    fn freeze_patch(patch: ConfigPatch) -> Result<Arc<ResolvedConfig>> {
        freeze(AccumulatedConfig::new().merge(patch), Some(&discovered()))
    }

    #[test]
    fn test_defaults() {
        let config = freeze_patch(ConfigPatch::new()).unwrap();
        assert_eq!(config.app_directory(), "app");
        assert_eq!(config.build_directory(), "build");
        assert_eq!(config.public_path(), "/");
        assert_eq!(config.server_build_file(), "index.js");
        assert_eq!(config.server_module_format(), ServerModuleFormat::Esm);
        assert!(!config.manifest());
        assert!(config.unstable_ssr());
        assert!(config.server_bundles().is_none());
        assert!(config.build_end().is_none());
        assert_eq!(config.future().as_value(), &json!({}));
        assert_eq!(config.routes().len(), 3);
    }

    #[test]
    fn test_ignored_route_files_removed() {
        let config = freeze_patch(ConfigPatch::new().ignored_route_files(["**/*.css"])).unwrap();
        assert_eq!(
            config.routes().ids().collect::<Vec<_>>(),
            vec!["root", "routes/_index"]
        );
    }

    #[test]
    fn test_declared_routes_extend_discovered() {
        let config = freeze_patch(ConfigPatch::new().routes([
            RouteNode::new("routes/health", "app/health.ts").with_parent("root"),
        ]))
        .unwrap();
        assert!(config.routes().get("routes/health").is_some());
    }

    #[test]
    fn test_declared_routes_without_discovery() {
        let acc = AccumulatedConfig::new().merge(ConfigPatch::new().set(
            ConfigKey::Routes,
            json!([{"id": "root", "file": "root.tsx"}]),
        ));
        let config = freeze(acc, None).unwrap();
        assert_eq!(config.routes().root().id, "root");
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = freeze_patch(ConfigPatch::new().set(ConfigKey::BuildDirectory, json!(3)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { key, .. } if key == "buildDirectory"
        ));

        let err = freeze_patch(ConfigPatch::new().set(ConfigKey::ServerModuleFormat, json!("umd")))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_try_set_always_fails() {
        let config = freeze_patch(ConfigPatch::new().build_directory("dist")).unwrap();
        let err = config.try_set("buildDirectory", json!("other")).unwrap_err();
        assert!(matches!(err, Error::FrozenConfig { path } if path == "buildDirectory"));
        assert_eq!(config.build_directory(), "dist");
    }

    #[test]
    fn test_serialized_key_set() {
        let config = freeze_patch(
            ConfigPatch::new()
                .ignored_route_files(["**/*.css"])
                .server_bundles(|_: &ServerBundlesArgs<'_>| "a".to_string()),
        )
        .unwrap();
        let json = config.to_json().unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            RESOLVED_KEYS.iter().map(|k| k.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(json["serverBundles"], json!("[function]"));
        assert_eq!(json["buildEnd"], Value::Null);
    }

    #[test]
    fn test_future_flag_lookup() {
        let config =
            freeze_patch(ConfigPatch::new().future(json!({"v3_singleFetch": true}))).unwrap();
        assert!(config.future_flag("v3_singleFetch"));
        assert!(!config.future_flag("v3_lazyRouteDiscovery"));
    }
}
