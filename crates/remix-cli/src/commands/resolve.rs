use colored::Colorize;
use remix_config::{ConfigResolver, PresetRegistry, ResolvedConfig};

use super::load_project;
use crate::cli::ProjectArgs;
use crate::error::Result;

pub async fn run_resolve(args: &ProjectArgs, registry: &PresetRegistry, json: bool) -> Result<()> {
    let project = load_project(args, registry)?;
    let presets = project.user.preset_names().join(", ");

    let mut resolver = ConfigResolver::new(project.user);
    if let Some(routes) = project.routes {
        resolver = resolver.with_routes(routes);
    }
    let resolved = resolver.resolve().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(resolved.as_ref())?);
    } else {
        print_summary(&resolved, &presets);
    }
    Ok(())
}

fn print_summary(config: &ResolvedConfig, presets: &str) {
    let function = |set: bool| if set { "set".green() } else { "not set".dimmed() };

    println!("{}", "Resolved config".bold());
    println!("  presets:            {}", if presets.is_empty() { "(none)" } else { presets });
    println!("  appDirectory:       {}", config.app_directory());
    println!("  buildDirectory:     {}", config.build_directory());
    println!("  publicPath:         {}", config.public_path());
    println!("  serverBuildFile:    {}", config.server_build_file());
    println!("  serverModuleFormat: {}", config.server_module_format());
    println!("  routes:             {}", config.routes().len());
    println!("  serverBundles:      {}", function(config.server_bundles().is_some()));
    println!("  buildEnd:           {}", function(config.build_end().is_some()));
}
