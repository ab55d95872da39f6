//! Sales rules: best seller, sales trend and revenue
//!
//! All three read only the windowed aggregate. Money in messages goes through
//! the `id-ID` formatter; metadata keeps the raw figures.

use crate::format::{format_currency, format_number};

use super::engine::{Rule, RuleContext};
use super::types::{
    BestSellerData, Insight, InsightData, InsightType, Priority, RevenueData, SalesTrendData,
};

/// Rule that names the product with the most sales in the window
pub struct BestSellerRule;

impl BestSellerRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BestSellerRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for BestSellerRule {
    fn id(&self) -> InsightType {
        InsightType::BestSeller
    }

    fn name(&self) -> &'static str {
        "Best Seller"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight> {
        let best = ctx.aggregate.best_seller()?;
        if best.sale_count == 0 {
            return None;
        }

        // Prefer the catalogue name; fall back to what the sale recorded
        let name = ctx
            .products
            .iter()
            .find(|p| p.id == best.product_id)
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
            .or_else(|| Some(best.product_name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or(best.product_id.as_str());

        let recommendation = if best.sale_count > ctx.thresholds.best_seller_restock_above {
            format!(
                "Consider increasing the stock of {} because demand is high",
                name
            )
        } else {
            format!("Promote {} more actively to increase its sales", name)
        };

        let message = format!(
            "{} is the best-selling product with {} {} {}",
            name,
            best.sale_count,
            if best.sale_count == 1 { "sale" } else { "sales" },
            ctx.period.phrase()
        );

        Some(
            Insight::new(
                InsightType::BestSeller,
                Priority::High,
                "Best Seller",
                message,
                recommendation,
            )
            .with_data(InsightData::BestSeller(BestSellerData {
                product_id: best.product_id.clone(),
                product_name: name.to_string(),
                sale_count: best.sale_count,
                revenue: best.revenue,
            })),
        )
    }
}

/// Rule that reports average sales per active day
pub struct SalesTrendRule;

impl SalesTrendRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SalesTrendRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for SalesTrendRule {
    fn id(&self) -> InsightType {
        InsightType::SalesTrend
    }

    fn name(&self) -> &'static str {
        "Sales Trend"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight> {
        let average = ctx.aggregate.average_daily_sales();
        if average <= 0.0 {
            return None;
        }

        let t = ctx.thresholds;
        let (priority, recommendation) = if average > t.trend_strong_above {
            (
                Priority::Low,
                "Sales are strong. Consider expanding your product catalogue",
            )
        } else if average > t.trend_steady_above {
            (
                Priority::Medium,
                "Sales are steady. Run promotions to push them higher",
            )
        } else {
            (
                Priority::Medium,
                "Sales are still low. Focus on promotion and customer service",
            )
        };

        Some(
            Insight::new(
                InsightType::SalesTrend,
                priority,
                "Sales Trend",
                format!(
                    "Average of {} sales per day",
                    format_number(round_half_up(average))
                ),
                recommendation,
            )
            .with_data(InsightData::SalesTrend(SalesTrendData {
                average_daily_sales: average,
                sales_days: ctx.aggregate.distinct_days(),
            })),
        )
    }
}

/// Rule that summarises revenue for the window
pub struct RevenueRule;

impl RevenueRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RevenueRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for RevenueRule {
    fn id(&self) -> InsightType {
        InsightType::Revenue
    }

    fn name(&self) -> &'static str {
        "Revenue Analysis"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight> {
        let revenue = ctx.aggregate.revenue();
        if revenue <= 0.0 {
            return None;
        }

        let daily_average = ctx.aggregate.daily_average_revenue();
        let t = ctx.thresholds;
        let recommendation = if daily_average > t.revenue_strong_above {
            "Revenue is excellent. Keep up the momentum and consider expanding"
        } else if daily_average > t.revenue_fair_above {
            "Revenue is fair. Look for ways to improve your margins"
        } else {
            "Focus on growing sales and running the store more efficiently"
        };

        let message = format!(
            "Revenue {}: {}",
            ctx.period.phrase(),
            format_currency(ctx.currency_symbol, revenue)
        );

        Some(
            Insight::new(
                InsightType::Revenue,
                Priority::Medium,
                "Revenue Analysis",
                message,
                recommendation,
            )
            .with_data(InsightData::Revenue(RevenueData {
                weekly_revenue: revenue,
                daily_average_revenue: round_half_up(daily_average),
            })),
        )
    }
}

/// Round to the nearest integer with halves going up (also for negatives)
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
