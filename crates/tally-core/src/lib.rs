//! Tally Core Library
//!
//! Shared functionality for the Tally point-of-sale analytics tool:
//! - Sale and product records with tolerant wire decoding
//! - Period windows over an explicit reference time
//! - Aggregation into per-product, per-day and per-weekday tallies
//! - Rule-based insight engine and weekday advisor
//! - Dashboard statistics
//! - Threshold configuration with embedded defaults

pub mod aggregate;
pub mod config;
pub mod error;
pub mod format;
pub mod insights;
pub mod models;
pub mod snapshot;
pub mod statistics;
pub mod window;

pub use aggregate::{AggregateSnapshot, BusiestDay, DayTally, ProductTally, WeekdayPattern};
pub use config::{ConfigSource, EngineConfig, Thresholds, WeekdayNames};
pub use error::{Error, Result};
pub use format::{format_currency, format_number};
pub use insights::{
    AnalysisContext, Insight, InsightData, InsightEngine, InsightType, Priority, Suggestion,
    SuggestionKind,
};
pub use models::{ProductRecord, SaleRecord};
pub use statistics::{BusiestDaySummary, StatisticsReport};
pub use window::Period;
