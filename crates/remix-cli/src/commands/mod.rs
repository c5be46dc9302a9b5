//! Command implementations

mod build;
mod presets;
mod resolve;

pub use build::{BuildOptions, run_build};
pub use presets::run_presets;
pub use resolve::run_resolve;

use std::path::{Path, PathBuf};

use remix_config::{CONFIG_FILE_NAME, PresetRegistry, UserConfig};
use remix_routes::RouteTree;

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

/// Default route-discovery output file
const ROUTES_FILE_NAME: &str = "routes.json";

/// Inputs shared by every command that resolves config
pub struct Project {
    pub cwd: PathBuf,
    pub user: UserConfig,
    pub routes: Option<RouteTree>,
}

/// Load the user config and route tree named by `args`
///
/// Explicit paths must exist. The default file names are optional.
pub fn load_project(args: &ProjectArgs, registry: &PresetRegistry) -> Result<Project> {
    let cwd = args.cwd.clone();

    let user = match &args.config {
        Some(path) => UserConfig::load(&cwd.join(path), registry)?,
        None => {
            let default = cwd.join(CONFIG_FILE_NAME);
            if default.exists() {
                UserConfig::load(&default, registry)?
            } else {
                tracing::debug!(path = %default.display(), "No config file, using defaults");
                UserConfig::default()
            }
        }
    };

    let routes = match &args.routes {
        Some(path) => Some(load_routes(&cwd.join(path))?),
        None => {
            let default = cwd.join(ROUTES_FILE_NAME);
            if default.exists() {
                Some(load_routes(&default)?)
            } else {
                None
            }
        }
    };

    Ok(Project { cwd, user, routes })
}

fn load_routes(path: &Path) -> Result<RouteTree> {
    if !path.exists() {
        return Err(CliError::user(format!(
            "Route tree not found at {}",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), "Loading route tree");
    Ok(RouteTree::from_json_file(path)?)
}
