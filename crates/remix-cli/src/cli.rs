//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Remix build pipeline - resolve presets and drive the server build
#[derive(Parser, Debug)]
#[command(name = "remix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where to find the project and its inputs
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ProjectArgs {
    /// Project directory; other paths are relative to it
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Config file (default: remix.config.toml, optional)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Route tree produced by route discovery (default: routes.json, optional)
    #[arg(short, long)]
    pub routes: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve config, run the build command, then call buildEnd
    ///
    /// Examples:
    ///   remix build -- npx vite build
    ///   remix build --manifest-out build/manifest.json -- ./bundle.sh
    Build {
        #[command(flatten)]
        project: ProjectArgs,

        /// Write the buildEnd payload as JSON to this path
        #[arg(long)]
        manifest_out: Option<PathBuf>,

        /// Port passed to the build command as PORT
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Build target passed to the build command as REMIX_BUILD_TARGET
        #[arg(long)]
        target: Option<String>,

        /// The build command and its arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Print the resolved config without building
    Resolve {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the built-in presets
    Presets,
}
