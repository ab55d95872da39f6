//! Engine configuration - thresholds, weekday names and locale
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a three-layer resolution:
//! 1. An explicit path (CLI `--config` or `TALLY_CONFIG`)
//! 2. Override in data dir (~/.local/share/tally/config/insights.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! The engine itself never loads configuration; callers resolve it once and
//! pass it in.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Rule thresholds used by the evaluators, advisor and statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thresholds {
    /// Best seller: recommend restocking when count is above this
    pub best_seller_restock_above: u32,
    /// Low stock: 0 < stock <= this
    pub low_stock_max: u32,
    /// Sales trend: average daily sales above this are strong
    pub trend_strong_above: f64,
    /// Sales trend: average daily sales above this are steady
    pub trend_steady_above: f64,
    /// Revenue: daily average above this is strong
    pub revenue_strong_above: f64,
    /// Revenue: daily average above this is fair
    pub revenue_fair_above: f64,
    /// Slow moving: stock above this
    pub slow_moving_min_stock: u32,
    /// Slow moving: fewer sales than this in the window
    pub slow_moving_max_sales: u32,
    /// Advisor: average transaction above this suggests premium pricing
    pub premium_transaction_above: f64,
    /// Advisor: this many distinct products counts as diverse
    pub diverse_products_min: usize,
    /// Statistics: length of the top products list
    pub top_products: usize,
    /// Statistics: number of dates in the daily revenue chart
    pub chart_days: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            best_seller_restock_above: 5,
            low_stock_max: 5,
            trend_strong_above: 10.0,
            trend_steady_above: 5.0,
            revenue_strong_above: 100_000.0,
            revenue_fair_above: 50_000.0,
            slow_moving_min_stock: 20,
            slow_moving_max_sales: 2,
            premium_transaction_above: 10_000.0,
            diverse_products_min: 3,
            top_products: 5,
            chart_days: 7,
        }
    }
}

/// Display names for weekdays, Sunday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayNames([String; 7]);

impl WeekdayNames {
    pub fn new(names: [String; 7]) -> Self {
        Self(names)
    }

    pub fn name(&self, day: Weekday) -> &str {
        &self.0[day.num_days_from_sunday() as usize]
    }
}

impl Default for WeekdayNames {
    fn default() -> Self {
        Self([
            "Sunday".to_string(),
            "Monday".to_string(),
            "Tuesday".to_string(),
            "Wednesday".to_string(),
            "Thursday".to_string(),
            "Friday".to_string(),
            "Saturday".to_string(),
        ])
    }
}

/// Everything the engine needs besides the data itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub weekday_names: WeekdayNames,
    pub currency_symbol: String,
    /// Offset that defines local calendar days; `None` means the host offset
    #[serde(serialize_with = "serialize_offset")]
    pub utc_offset: Option<FixedOffset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            weekday_names: WeekdayNames::default(),
            currency_symbol: "Rp".to_string(),
            utc_offset: None,
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Override(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Override(path) => write!(f, "{} (override)", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

impl EngineConfig {
    /// Load configuration, preferring an explicit path over the override file
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            return Ok((Self::parse(&content)?, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                return Ok((Self::parse(&content)?, ConfigSource::Override(path)));
            }
        }

        Ok((Self::parse(DEFAULT_CONFIG)?, ConfigSource::Embedded))
    }

    /// Parse config from TOML content, keeping defaults for missing keys
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();
        let t = &mut config.thresholds;

        if let Some(locale) = raw.locale {
            if let Some(symbol) = locale.currency_symbol {
                config.currency_symbol = symbol;
            }
            if let Some(offset) = locale.utc_offset {
                config.utc_offset = Some(parse_utc_offset(&offset)?);
            }
            if let Some(names) = locale.weekday_names {
                let names: [String; 7] = names.try_into().map_err(|v: Vec<String>| {
                    Error::Config(format!(
                        "weekday_names needs 7 entries (Sunday first), got {}",
                        v.len()
                    ))
                })?;
                config.weekday_names = WeekdayNames::new(names);
            }
        }

        if let Some(best) = raw.best_seller {
            if let Some(v) = best.restock_above {
                t.best_seller_restock_above = v;
            }
        }

        if let Some(stock) = raw.stock {
            if let Some(v) = stock.low_stock_max {
                t.low_stock_max = v;
            }
        }

        if let Some(trend) = raw.trend {
            if let Some(v) = trend.strong_above {
                t.trend_strong_above = v;
            }
            if let Some(v) = trend.steady_above {
                t.trend_steady_above = v;
            }
        }

        if let Some(revenue) = raw.revenue {
            if let Some(v) = revenue.strong_above {
                t.revenue_strong_above = v;
            }
            if let Some(v) = revenue.fair_above {
                t.revenue_fair_above = v;
            }
        }

        if let Some(slow) = raw.slow_moving {
            if let Some(v) = slow.min_stock {
                t.slow_moving_min_stock = v;
            }
            if let Some(v) = slow.max_sales {
                t.slow_moving_max_sales = v;
            }
        }

        if let Some(advisor) = raw.advisor {
            if let Some(v) = advisor.premium_transaction_above {
                t.premium_transaction_above = v;
            }
            if let Some(v) = advisor.diverse_products_min {
                t.diverse_products_min = v;
            }
        }

        if let Some(stats) = raw.statistics {
            if let Some(v) = stats.top_products {
                t.top_products = v;
            }
            if let Some(v) = stats.chart_days {
                t.chart_days = v;
            }
        }

        Ok(config)
    }

    /// Express a wall-clock instant in the configured local offset
    ///
    /// Falls back to the host's offset at that instant when none is configured.
    pub fn localize(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self.utc_offset {
            Some(offset) => now.with_timezone(&offset),
            None => now.with_timezone(&Local).fixed_offset(),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("insights.toml"))
}

/// Parse offsets like "+07:00", "-0330", "+7" or "Z"
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let s = input.trim();
    let invalid = || Error::Config(format!("Invalid UTC offset: {}", input));

    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    // Whole hours without minutes ("+7", "-10")
    if let Some(hours) = s.strip_prefix(['+', '-']) {
        if !hours.is_empty() && hours.len() <= 2 && hours.chars().all(|c| c.is_ascii_digit()) {
            let hours: i32 = hours.parse().map_err(|_| invalid())?;
            let sign = if s.starts_with('-') { -1 } else { 1 };
            return FixedOffset::east_opt(sign * hours * 3600).ok_or_else(invalid);
        }
    }

    s.parse::<FixedOffset>().map_err(|_| invalid())
}

fn serialize_offset<S>(
    offset: &Option<FixedOffset>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match offset {
        Some(offset) => serializer.serialize_some(&offset.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    locale: Option<RawLocale>,
    best_seller: Option<RawBestSeller>,
    stock: Option<RawStock>,
    trend: Option<RawBands>,
    revenue: Option<RawRevenue>,
    slow_moving: Option<RawSlowMoving>,
    advisor: Option<RawAdvisor>,
    statistics: Option<RawStatistics>,
}

#[derive(Debug, Deserialize)]
struct RawLocale {
    currency_symbol: Option<String>,
    utc_offset: Option<String>,
    weekday_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawBestSeller {
    restock_above: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawStock {
    low_stock_max: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawBands {
    strong_above: Option<f64>,
    steady_above: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRevenue {
    strong_above: Option<f64>,
    fair_above: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSlowMoving {
    min_stock: Option<u32>,
    max_sales: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAdvisor {
    premium_transaction_above: Option<f64>,
    diverse_products_min: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawStatistics {
    top_products: Option<usize>,
    chart_days: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = EngineConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::parse(
            r#"
            [stock]
            low_stock_max = 10

            [locale]
            utc_offset = "+07:00"
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.low_stock_max, 10);
        assert_eq!(config.thresholds.slow_moving_min_stock, 20);
        assert_eq!(config.utc_offset, FixedOffset::east_opt(7 * 3600));
        assert_eq!(config.currency_symbol, "Rp");
    }

    #[test]
    fn test_weekday_names_must_have_seven_entries() {
        let result = EngineConfig::parse(
            r#"
            [locale]
            weekday_names = ["Minggu", "Senin"]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_weekday_names() {
        let config = EngineConfig::parse(
            r#"
            [locale]
            weekday_names = ["Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"]
            "#,
        )
        .unwrap();
        assert_eq!(config.weekday_names.name(Weekday::Sat), "Sabtu");
        assert_eq!(config.weekday_names.name(Weekday::Sun), "Minggu");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(EngineConfig::parse("[stock\nlow").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[revenue]\nstrong_above = 1.0").unwrap();

        let (config, source) = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.thresholds.revenue_strong_above, 1.0);
        assert_eq!(source, ConfigSource::Explicit(file.path().to_path_buf()));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = EngineConfig::load(Some(Path::new("/nonexistent/tally.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+07:00").unwrap().local_minus_utc(), 7 * 3600);
        assert_eq!(parse_utc_offset("-0330").unwrap().local_minus_utc(), -(3 * 3600 + 1800));
        assert_eq!(parse_utc_offset("+8").unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("07:00").is_err());
        assert!(parse_utc_offset("+07:75").is_err());
        assert_eq!(parse_utc_offset("-10").unwrap().local_minus_utc(), -10 * 3600);
        assert_eq!(parse_utc_offset(" UTC ").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("+").is_err());
        assert!(parse_utc_offset("+99").is_err());
    }

    #[test]
    fn test_localize_with_configured_offset() {
        let config = EngineConfig {
            utc_offset: FixedOffset::east_opt(7 * 3600),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
        let local = config.localize(now);
        assert_eq!(local.date_naive().to_string(), "2026-10-20");
    }
}
