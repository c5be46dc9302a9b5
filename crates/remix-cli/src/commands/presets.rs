use colored::Colorize;
use remix_config::PresetRegistry;

use crate::error::Result;

pub fn run_presets(registry: &PresetRegistry) -> Result<()> {
    println!("{}", "Built-in presets:".bold());
    for name in registry.names() {
        println!("  {}", name.cyan());
    }
    Ok(())
}
