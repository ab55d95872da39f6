//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Business insights from point-of-sale data
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Retail sales insight engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Insight configuration file (TOML)
    ///
    /// Without it, ~/.local/share/tally/config/insights.toml is used when
    /// present, then the built-in defaults.
    #[arg(long, env = "TALLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Snapshot files and analysis window
#[derive(Args)]
pub struct SnapshotArgs {
    /// JSON file with sale records (array, or object with "sales")
    #[arg(short, long)]
    pub sales: PathBuf,

    /// JSON file with product records (array, or object with "products")
    #[arg(short, long)]
    pub products: PathBuf,

    /// Period: today, week, month, year, custom
    #[arg(long, default_value = "week")]
    pub period: String,

    /// Custom period start (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Custom period end (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Reference time (RFC 3339), defaults to now
    #[arg(long)]
    pub now: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate prioritised insights for a snapshot
    Insights {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Show sales statistics and weekday suggestions
    Stats {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "TALLY_PORT", default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "TALLY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show the effective configuration and where it came from
    Config,
}
