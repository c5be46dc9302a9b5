//! Remix build pipeline CLI
//!
//! Resolves presets and user config, runs the external build command, and
//! hands the resulting manifest to `buildEnd`.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use remix_config::PresetRegistry;

use cli::{Cli, Commands};
use commands::BuildOptions;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialise logging: {e}", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");

    let registry = PresetRegistry::with_builtins();
    match cli.command {
        Some(cmd) => execute_command(cmd, &registry).await,
        None => {
            println!("{} Remix build pipeline", "remix".green().bold());
            println!();
            println!("Run {} for available commands.", "remix --help".cyan());
            Ok(())
        }
    }
}

async fn execute_command(cmd: Commands, registry: &PresetRegistry) -> Result<()> {
    match cmd {
        Commands::Build {
            project,
            manifest_out,
            port,
            target,
            command,
        } => {
            let options = BuildOptions {
                manifest_out,
                port,
                target,
                command,
            };
            commands::run_build(&project, registry, options).await
        }
        Commands::Resolve { project, json } => commands::run_resolve(&project, registry, json).await,
        Commands::Presets => commands::run_presets(registry),
    }
}
