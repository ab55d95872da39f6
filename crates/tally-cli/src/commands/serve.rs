//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::load_config;

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    let (engine, source) = load_config(config_path)?;

    println!("🚀 Starting Tally web server...");
    println!("   Config: {}", source);
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = tally_server::ServerConfig {
        engine,
        reference_time: None,
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    tally_server::serve_with_config(host, port, static_dir_str, config).await?;

    Ok(())
}
