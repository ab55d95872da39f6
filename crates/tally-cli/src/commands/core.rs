//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the engine configuration
//! - `load_snapshot` - Read snapshot files and resolve the analysis window
//! - `resolve_period` / `resolve_now` - Window and reference time parsing

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tally_core::{
    snapshot, AnalysisContext, ConfigSource, EngineConfig, Period, ProductRecord, SaleRecord,
};

/// Snapshot inputs as given on the command line
pub struct SnapshotInput<'a> {
    pub sales: &'a Path,
    pub products: &'a Path,
    pub period: &'a str,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub now: Option<&'a str>,
}

/// Records and window ready for the engine
pub struct LoadedSnapshot {
    pub sales: Vec<SaleRecord>,
    pub products: Vec<ProductRecord>,
    pub period: Period,
    pub now: DateTime<FixedOffset>,
}

impl LoadedSnapshot {
    pub fn context(&self) -> AnalysisContext<'_> {
        AnalysisContext::new(&self.sales, &self.products, self.now).with_period(self.period)
    }
}

/// Load configuration from an explicit path, the override file, or defaults
pub fn load_config(path: Option<&Path>) -> Result<(EngineConfig, ConfigSource)> {
    let (config, source) = EngineConfig::load(path).context("Failed to load configuration")?;
    tracing::debug!(source = %source, "Loaded configuration");
    Ok((config, source))
}

pub fn load_snapshot(input: &SnapshotInput<'_>, config: &EngineConfig) -> Result<LoadedSnapshot> {
    let sales = snapshot::read_sales(input.sales)
        .with_context(|| format!("Failed to read sales from {}", input.sales.display()))?;
    let products = snapshot::read_products(input.products)
        .with_context(|| format!("Failed to read products from {}", input.products.display()))?;

    Ok(LoadedSnapshot {
        sales,
        products,
        period: resolve_period(input.period, input.from, input.to)?,
        now: resolve_now(input.now, config)?,
    })
}

/// Resolve a period tag plus optional custom dates
///
/// Giving `--from` or `--to` implies a custom period.
pub fn resolve_period(period: &str, from: Option<&str>, to: Option<&str>) -> Result<Period> {
    let start = from
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
        .transpose()
        .context("Invalid --from date format (use YYYY-MM-DD)")?;
    let end = to
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
        .transpose()
        .context("Invalid --to date format (use YYYY-MM-DD)")?;

    let tag = if start.is_some() || end.is_some() {
        "custom"
    } else {
        period
    };

    let period = Period::from_parts(tag, start, end)?;
    if let Period::Custom { start, end } = period {
        if start.is_none() || end.is_none() {
            tracing::warn!("Custom period needs both --from and --to; analysing all sales");
        }
    }

    Ok(period)
}

/// Resolve the reference time
///
/// A configured `utc_offset` wins; otherwise an explicit `--now` keeps its own
/// offset and the wall clock uses the host's.
pub fn resolve_now(now: Option<&str>, config: &EngineConfig) -> Result<DateTime<FixedOffset>> {
    match now {
        Some(s) => {
            let parsed = DateTime::parse_from_rfc3339(s)
                .with_context(|| format!("Invalid --now '{}' (use RFC 3339)", s))?;
            Ok(match config.utc_offset {
                Some(offset) => parsed.with_timezone(&offset),
                None => parsed,
            })
        }
        None => Ok(config.localize(Utc::now())),
    }
}
