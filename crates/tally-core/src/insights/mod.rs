//! Insight Engine - prioritised business insights from a sales snapshot
//!
//! Six rules run over one aggregate of the selected period and each yields at
//! most one insight. The advisor adds weekday suggestions based on the rolling
//! week.
//!
//! ## Rules
//!
//! - **Best Seller** - product with the most sales
//! - **Out of Stock** / **Low Stock** - catalogue stock alerts
//! - **Sales Trend** - average sales per active day
//! - **Revenue Analysis** - revenue and daily average
//! - **Slow-Moving Products** - high stock that barely sells
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::insights::{AnalysisContext, InsightEngine};
//!
//! let engine = InsightEngine::with_config(config);
//! let ctx = AnalysisContext::new(&sales, &products, now).with_period(Period::Month);
//! let insights = engine.analyze(&ctx);
//! ```

pub mod advisor;
pub mod engine;
pub mod sales;
pub mod stock;
pub mod types;

pub use engine::{sort_by_priority, AnalysisContext, InsightEngine, Rule, RuleContext};
pub use sales::{BestSellerRule, RevenueRule, SalesTrendRule};
pub use stock::{LowStockRule, OutOfStockRule, SlowMovingRule};
pub use types::{
    BestSellerData, Insight, InsightData, InsightType, Priority, ProductNamesData, RevenueData,
    SalesTrendData, StockLevel, StockLevelsData, Suggestion, SuggestionKind,
};
