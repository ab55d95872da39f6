//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Product with the most sales in the window
    BestSeller,
    /// Products with no stock left
    StockAlert,
    /// Products close to running out
    LowStock,
    /// Average sales per day
    SalesTrend,
    /// Revenue summary for the window
    Revenue,
    /// High stock that barely sells
    SlowMoving,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::BestSeller => "best_seller",
            InsightType::StockAlert => "stock_alert",
            InsightType::LowStock => "low_stock",
            InsightType::SalesTrend => "sales_trend",
            InsightType::Revenue => "revenue",
            InsightType::SlowMoving => "slow_moving",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best_seller" => Ok(InsightType::BestSeller),
            "stock_alert" => Ok(InsightType::StockAlert),
            "low_stock" => Ok(InsightType::LowStock),
            "sales_trend" => Ok(InsightType::SalesTrend),
            "revenue" => Ok(InsightType::Revenue),
            "slow_moving" => Ok(InsightType::SlowMoving),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// How urgently an insight needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A business observation produced by one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub message: String,
    pub recommendation: String,
    pub priority: Priority,
    /// Raw figures behind the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<InsightData>,
}

impl Insight {
    pub fn new(
        insight_type: InsightType,
        priority: Priority,
        title: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            insight_type,
            title: title.into(),
            message: message.into(),
            recommendation: recommendation.into(),
            priority,
            metadata: None,
        }
    }

    /// Attach structured data
    pub fn with_data(mut self, data: InsightData) -> Self {
        self.metadata = Some(data);
        self
    }
}

/// Insight-specific structured data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsightData {
    BestSeller(BestSellerData),
    SalesTrend(SalesTrendData),
    Revenue(RevenueData),
    ProductNames(ProductNamesData),
    StockLevels(StockLevelsData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSellerData {
    pub product_id: String,
    pub product_name: String,
    pub sale_count: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrendData {
    pub average_daily_sales: f64,
    pub sales_days: usize,
}

/// Revenue figures for the analysed window
///
/// `weekly_revenue` keeps its name from the default 7-day window used by the
/// analytics API; it always holds the revenue of the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueData {
    pub weekly_revenue: f64,
    /// Rounded to the nearest whole currency unit
    pub daily_average_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductNamesData {
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevelsData {
    pub products: Vec<StockLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub name: String,
    pub stock: u32,
}

/// Kinds of advisor suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Staffing and opening hours around the busiest day
    Schedule,
    /// Keep the busiest day's top product available
    Product,
    /// High average transaction: lean into premium pricing
    Pricing,
    /// Low average transaction: push volume
    Volume,
    /// Many distinct products sold
    Diversity,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Schedule => "schedule",
            SuggestionKind::Product => "product",
            SuggestionKind::Pricing => "pricing",
            SuggestionKind::Volume => "volume",
            SuggestionKind::Diversity => "diversity",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualitative advice derived from the weekday pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub content: String,
}

impl Suggestion {
    pub fn new(kind: SuggestionKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
        }
    }
}
