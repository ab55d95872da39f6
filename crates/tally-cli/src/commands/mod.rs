//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `config` - Show the effective configuration
//! - `core` - Shared utilities (config, snapshot, period and clock resolution)
//! - `insights` - Insight and statistics commands
//! - `serve` - Web server command

pub mod config;
pub mod core;
pub mod insights;
pub mod serve;

// Re-export command functions for main.rs
pub use config::*;
pub use core::*;
pub use insights::*;
pub use serve::*;
