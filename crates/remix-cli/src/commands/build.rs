use colored::Colorize;
use remix_build::{BuildRequest, ProcessBuildTrigger, WriteBuildEndPayload, build};
use remix_config::PresetRegistry;

use super::load_project;
use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

/// Options for `remix build` beyond the project inputs
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub manifest_out: Option<std::path::PathBuf>,
    pub port: Option<u16>,
    pub target: Option<String>,
    pub command: Vec<String>,
}

pub async fn run_build(
    args: &ProjectArgs,
    registry: &PresetRegistry,
    options: BuildOptions,
) -> Result<()> {
    let mut project = load_project(args, registry)?;

    let trigger = ProcessBuildTrigger::from_command(&options.command)
        .ok_or_else(|| CliError::user("No build command given"))?;

    // A manifest path on the command line takes over buildEnd
    if let Some(path) = &options.manifest_out {
        project.user.patch = project
            .user
            .patch
            .build_end(WriteBuildEndPayload::new(project.cwd.join(path)));
    }

    let mut request = BuildRequest::new(&project.cwd);
    request.port = options.port;
    request.target = options.target;

    let manifest = build(project.user, project.routes, trigger, request).await?;

    println!(
        "{} Build complete: {} routes, {} server bundles",
        "✓".green().bold(),
        manifest.routes.len(),
        manifest.server_bundles.len()
    );
    for bundle in manifest.server_bundles.values() {
        println!("  {} {}", bundle.id.cyan(), bundle.file.dimmed());
    }
    Ok(())
}
