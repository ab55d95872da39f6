//! Stock rules: out of stock, low stock and slow-moving products
//!
//! These look at the catalogue; only slow moving also needs the window's
//! sale counts.

use crate::models::ProductRecord;

use super::engine::{Rule, RuleContext};
use super::types::{
    Insight, InsightData, InsightType, Priority, ProductNamesData, StockLevel, StockLevelsData,
};

/// Rule that lists products with no stock left
pub struct OutOfStockRule;

impl OutOfStockRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutOfStockRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for OutOfStockRule {
    fn id(&self) -> InsightType {
        InsightType::StockAlert
    }

    fn name(&self) -> &'static str {
        "Out of Stock"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight> {
        let names: Vec<String> = ctx
            .products
            .iter()
            .filter(|p| p.stock == 0)
            .map(|p| p.name.clone())
            .collect();

        if names.is_empty() {
            return None;
        }

        let message = format!(
            "{} out of stock: {}",
            count_phrase(names.len()),
            names.join(", ")
        );

        Some(
            Insight::new(
                InsightType::StockAlert,
                Priority::Critical,
                "Out of Stock",
                message,
                "Restock empty products immediately to avoid lost sales",
            )
            .with_data(InsightData::ProductNames(ProductNamesData { products: names })),
        )
    }
}

/// Rule that lists products close to running out
pub struct LowStockRule;

impl LowStockRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LowStockRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LowStockRule {
    fn id(&self) -> InsightType {
        InsightType::LowStock
    }

    fn name(&self) -> &'static str {
        "Low Stock"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight> {
        let max = ctx.thresholds.low_stock_max;
        let low = stock_levels(ctx.products.iter().filter(|p| p.stock > 0 && p.stock <= max));

        if low.is_empty() {
            return None;
        }

        let message = format!(
            "{} running low on stock: {}",
            count_phrase(low.len()),
            describe_levels(&low)
        );

        Some(
            Insight::new(
                InsightType::LowStock,
                Priority::Medium,
                "Low Stock",
                message,
                "Plan a restock for products that are running low",
            )
            .with_data(InsightData::StockLevels(StockLevelsData { products: low })),
        )
    }
}

/// Rule that flags well-stocked products that barely sell
pub struct SlowMovingRule;

impl SlowMovingRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SlowMovingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for SlowMovingRule {
    fn id(&self) -> InsightType {
        InsightType::SlowMoving
    }

    fn name(&self) -> &'static str {
        "Slow-Moving Products"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight> {
        let t = ctx.thresholds;
        let slow = stock_levels(ctx.products.iter().filter(|p| {
            p.stock > t.slow_moving_min_stock
                && ctx.aggregate.sale_count_for(&p.id) < t.slow_moving_max_sales
        }));

        if slow.is_empty() {
            return None;
        }

        let message = format!(
            "{} low sales with high stock {}: {}",
            have_phrase(slow.len()),
            ctx.period.phrase(),
            describe_levels(&slow)
        );

        Some(
            Insight::new(
                InsightType::SlowMoving,
                Priority::Low,
                "Slow-Moving Products",
                message,
                "Consider special promotions or discounts for slow-moving products",
            )
            .with_data(InsightData::StockLevels(StockLevelsData { products: slow })),
        )
    }
}

fn stock_levels<'a>(products: impl Iterator<Item = &'a ProductRecord>) -> Vec<StockLevel> {
    products
        .map(|p| StockLevel {
            name: p.name.clone(),
            stock: p.stock,
        })
        .collect()
}

fn describe_levels(levels: &[StockLevel]) -> String {
    levels
        .iter()
        .map(|l| format!("{} ({} left)", l.name, l.stock))
        .collect::<Vec<_>>()
        .join(", ")
}

/// "1 product is" / "3 products are"
fn count_phrase(n: usize) -> String {
    if n == 1 {
        "1 product is".to_string()
    } else {
        format!("{} products are", n)
    }
}

/// "1 product has" / "3 products have"
fn have_phrase(n: usize) -> String {
    if n == 1 {
        "1 product has".to_string()
    } else {
        format!("{} products have", n)
    }
}
