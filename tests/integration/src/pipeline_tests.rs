//! Pipeline Integration Tests
//!
//! These tests run a whole build, from a config file on disk to the
//! `buildEnd` payload, across all crates in the workspace.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use remix_build::{BuildRequest, BuildStatus, BuildTrigger, Error, WriteBuildEndPayload, build};
use remix_config::{
    BoxError, ConfigKey, ConfigPatch, Preset, PresetRegistry, RemixConfigArgs,
    RemixConfigResolvedArgs, ServerModuleFormat, UserConfig,
};
use remix_routes::RouteTree;
use remix_test_utils::TestProject;
use serde_json::json;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A trigger that always reports the given status
struct FixedTrigger(BuildStatus);

#[async_trait]
impl BuildTrigger for FixedTrigger {
    async fn trigger(&self, _request: &BuildRequest) -> remix_build::Result<BuildStatus> {
        Ok(self.0.clone())
    }
}

/// A blog-shaped app: root, index, a blog layout with a post route, a
/// pathless auth layout, and a stray stylesheet route discovery picked up
fn blog_project() -> TestProject {
    let project = TestProject::new();
    project.write_routes(&[
        json!({"id": "root", "file": "app/root.tsx"}),
        json!({"id": "routes/_index", "parentId": "root", "index": true, "file": "app/routes/_index.tsx"}),
        json!({"id": "routes/blog", "parentId": "root", "path": "blog", "file": "app/routes/blog.tsx"}),
        json!({"id": "routes/blog.$slug", "parentId": "routes/blog", "path": ":slug", "file": "app/routes/blog.$slug.tsx"}),
        json!({"id": "routes/_auth", "parentId": "root", "file": "app/routes/_auth.tsx"}),
        json!({"id": "routes/_auth.login", "parentId": "routes/_auth", "path": "login", "file": "app/routes/_auth.login.tsx"}),
        json!({"id": "routes/styles", "parentId": "root", "path": "styles", "file": "app/routes/styles.css"}),
    ]);
    project
}

fn load(project: &TestProject) -> (UserConfig, RouteTree) {
    let user = UserConfig::load(
        &project.path("remix.config.toml"),
        &PresetRegistry::with_builtins(),
    )
    .unwrap();
    let routes = RouteTree::from_json_file(&project.path("routes.json")).unwrap();
    (user, routes)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_top_level_bundles_from_config_file() {
    let project = blog_project();
    project.write_config(
        r#"
presets = ["server-bundles:top-level"]
ignoredRouteFiles = ["**/*.css"]
"#,
    );
    let (mut user, routes) = load(&project);
    user.patch = user
        .patch
        .build_end(WriteBuildEndPayload::new(project.path("build/end.json")));

    let manifest = build(
        user,
        Some(routes),
        FixedTrigger(BuildStatus::success()),
        BuildRequest::new(project.root()),
    )
    .await
    .unwrap();

    // The root and the pathless auth layout are not assigned; the
    // stylesheet route is ignored
    assert_eq!(
        manifest
            .route_id_to_server_bundle_id
            .iter()
            .map(|(route, bundle)| (route.as_str(), bundle.as_str()))
            .collect::<Vec<_>>(),
        vec![
            ("routes/_auth.login", "root"),
            ("routes/_index", "root"),
            ("routes/blog", "blog"),
            ("routes/blog.$slug", "blog"),
        ]
    );
    assert!(manifest.routes.get("routes/styles").is_none());
    assert_eq!(
        manifest.server_bundles.keys().collect::<Vec<_>>(),
        vec!["blog", "root"]
    );

    let payload = project.read_json("build/end.json");
    assert_eq!(payload["remixConfig"]["routes"].as_object().unwrap().len(), 6);
    assert_eq!(payload["buildManifest"]["routes"], payload["remixConfig"]["routes"]);
}

#[tokio::test]
async fn test_user_file_overrides_declared_preset() {
    let project = blog_project();
    project.write_config(
        r#"
presets = ["cjs-output"]
serverBuildFile = "server.mjs"

[preset.cjs-output]
serverModuleFormat = "cjs"
serverBuildFile = "index.cjs"
"#,
    );
    let (user, routes) = load(&project);

    let manifest = build(
        user,
        Some(routes),
        FixedTrigger(BuildStatus::success()),
        BuildRequest::new(project.root()),
    )
    .await
    .unwrap();

    assert_eq!(manifest.server_bundles["index"].file, "build/server/server.mjs");
}

/// Rejects CommonJS output after resolution and records what it saw
struct EsmOnly {
    seen: Arc<Mutex<Option<ServerModuleFormat>>>,
}

#[async_trait]
impl Preset for EsmOnly {
    fn name(&self) -> &str {
        "esm-only"
    }

    async fn remix_config(
        &self,
        args: RemixConfigArgs<'_>,
    ) -> Result<Option<ConfigPatch>, BoxError> {
        // Earlier presets already chose a format; leave it alone
        if args.remix_config.contains(ConfigKey::ServerModuleFormat) {
            return Ok(None);
        }
        Ok(Some(ConfigPatch::new().server_module_format(ServerModuleFormat::Esm)))
    }

    async fn remix_config_resolved(
        &self,
        args: RemixConfigResolvedArgs<'_>,
    ) -> Result<(), BoxError> {
        let format = args.remix_config.server_module_format();
        *self.seen.lock().unwrap() = Some(format);
        if format == ServerModuleFormat::Cjs {
            return Err("CommonJS server builds are not supported".into());
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_resolved_hook_sees_user_override_and_aborts_build() {
    let project = blog_project();
    let routes = RouteTree::from_json_file(&project.path("routes.json")).unwrap();
    let seen = Arc::new(Mutex::new(None));
    let user = UserConfig::new(
        vec![Arc::new(EsmOnly { seen: seen.clone() }) as Arc<dyn Preset>],
        ConfigPatch::new()
            .server_module_format(ServerModuleFormat::Cjs)
            .build_end(WriteBuildEndPayload::new(project.path("build/end.json"))),
    );

    let err = build(
        user,
        Some(routes),
        FixedTrigger(BuildStatus::success()),
        BuildRequest::new(project.root()),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("esm-only"), "got: {err}");
    assert!(matches!(err, Error::Resolution(_)));
    assert_eq!(*seen.lock().unwrap(), Some(ServerModuleFormat::Cjs));
    project.assert_file_not_exists("build/end.json");
}

#[tokio::test]
async fn test_config_declared_routes_join_the_manifest() {
    let project = blog_project();
    let routes = RouteTree::from_json_file(&project.path("routes.json")).unwrap();
    let user = UserConfig::new(
        Vec::new(),
        ConfigPatch::new().set(
            ConfigKey::Routes,
            json!({
                "routes/healthz": {"parentId": "root", "path": "healthz", "file": "app/healthz.ts"}
            }),
        ),
    );

    let manifest = build(
        user,
        Some(routes),
        FixedTrigger(BuildStatus::success()),
        BuildRequest::new(project.root()),
    )
    .await
    .unwrap();

    assert_eq!(
        manifest.route_id_to_server_bundle_id.get("routes/healthz"),
        Some(&"index".to_string())
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_build_command_runs_in_project_directory() {
    use remix_build::ProcessBuildTrigger;
    use remix_test_utils::commands;

    let project = blog_project();
    let (program, args) = commands::shell("mkdir -p build/server && touch build/server/index.js");
    let routes = RouteTree::from_json_file(&project.path("routes.json")).unwrap();

    build(
        UserConfig::default(),
        Some(routes),
        ProcessBuildTrigger::new(program, args),
        BuildRequest::new(project.root()),
    )
    .await
    .unwrap();

    project.assert_file_exists("build/server/index.js");
}
