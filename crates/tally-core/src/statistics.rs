//! Dashboard statistics for one period

use serde::Serialize;

use crate::aggregate::{AggregateSnapshot, DayTally, ProductTally};
use crate::config::EngineConfig;
use crate::insights::{AnalysisContext, Suggestion};

/// Figures shown on the statistics screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    /// Period tag (`today`, `week`, ...)
    pub period: String,
    pub period_label: String,
    pub total_revenue: f64,
    /// Number of sale records in the period
    pub total_transactions: usize,
    /// Sum of quantities
    pub units_sold: u64,
    pub average_transaction: f64,
    /// Products in the catalogue
    pub product_count: usize,
    /// Highest revenue first, grouped by product name
    pub top_products: Vec<ProductTally>,
    /// Most recent dates with sales, oldest first
    pub daily_revenue: Vec<DayTally>,
    /// Busiest weekday of the rolling week
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_day: Option<BusiestDaySummary>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusiestDaySummary {
    pub day: String,
    pub total_transactions: u32,
    pub total_revenue: f64,
    pub average_transaction: f64,
    pub products: Vec<ProductTally>,
}

impl StatisticsReport {
    pub fn build(
        aggregate: &AggregateSnapshot,
        ctx: &AnalysisContext<'_>,
        config: &EngineConfig,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        let t = &config.thresholds;

        let busiest_day = aggregate.weekdays().busiest().map(|busiest| BusiestDaySummary {
            day: config.weekday_names.name(busiest.weekday).to_string(),
            total_transactions: busiest.sale_count,
            total_revenue: busiest.revenue,
            average_transaction: busiest.average_transaction(),
            products: busiest.products,
        });

        Self {
            period: ctx.period.as_str().to_string(),
            period_label: ctx.period.label().to_string(),
            total_revenue: aggregate.revenue(),
            total_transactions: aggregate.sale_count(),
            units_sold: aggregate.units(),
            average_transaction: aggregate.average_transaction(),
            product_count: ctx.products.len(),
            top_products: aggregate.top_products(t.top_products),
            daily_revenue: aggregate.last_days(t.chart_days).into_iter().cloned().collect(),
            busiest_day,
            suggestions,
        }
    }
}
