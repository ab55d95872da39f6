//! Tally CLI - Retail sales insight engine
//!
//! Usage:
//!   tally insights --sales S.json --products P.json   Prioritised insights
//!   tally stats --sales S.json --products P.json      Statistics and suggestions
//!   tally serve --port 3000                           Start web server
//!   tally config                                      Show effective configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Insights { snapshot } => {
            commands::cmd_insights(config, &snapshot_input(&snapshot), snapshot.json)
        }
        Commands::Stats { snapshot } => {
            commands::cmd_stats(config, &snapshot_input(&snapshot), snapshot.json)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(config, &host, port, static_dir.as_deref()).await,
        Commands::Config => commands::cmd_config(config),
    }
}

fn snapshot_input(args: &SnapshotArgs) -> commands::SnapshotInput<'_> {
    commands::SnapshotInput {
        sales: &args.sales,
        products: &args.products,
        period: &args.period,
        from: args.from.as_deref(),
        to: args.to.as_deref(),
        now: args.now.as_deref(),
    }
}
