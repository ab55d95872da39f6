//! Config command implementation

use std::path::Path;

use anyhow::Result;
use tally_core::config::default_config_path;

use super::load_config;

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let (config, source) = load_config(config_path)?;

    println!("⚙️  Configuration");
    println!("   ─────────────────────────────");
    println!("   Source: {}", source);
    if let Some(path) = default_config_path() {
        println!("   Override path: {}", path.display());
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
