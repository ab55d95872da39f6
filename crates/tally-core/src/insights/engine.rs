//! Insight Engine - runs the rule evaluators and the advisor over one snapshot

use chrono::{DateTime, FixedOffset};

use crate::aggregate::AggregateSnapshot;
use crate::config::{EngineConfig, Thresholds};
use crate::models::{ProductRecord, SaleRecord};
use crate::statistics::StatisticsReport;
use crate::window::Period;

use super::advisor;
use super::types::{Insight, InsightType, Suggestion};
use super::{
    BestSellerRule, LowStockRule, OutOfStockRule, RevenueRule, SalesTrendRule, SlowMovingRule,
};

/// Snapshot and reference time handed to the engine
pub struct AnalysisContext<'a> {
    /// Every sale known to the caller; the period selects from these
    pub sales: &'a [SaleRecord],
    /// Current product catalogue
    pub products: &'a [ProductRecord],
    /// Reference instant; its offset defines local calendar days
    pub now: DateTime<FixedOffset>,
    pub period: Period,
}

impl<'a> AnalysisContext<'a> {
    /// Create a context over the rolling 7-day window
    pub fn new(
        sales: &'a [SaleRecord],
        products: &'a [ProductRecord],
        now: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            sales,
            products,
            now,
            period: Period::Week,
        }
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Aggregate the sales that fall in the selected period
    pub fn aggregate(&self) -> AggregateSnapshot {
        let windowed = self.period.select(self.sales, &self.now);
        AggregateSnapshot::build(&windowed, self.sales, &self.now)
    }
}

/// Inputs visible to a single rule
pub struct RuleContext<'a> {
    pub aggregate: &'a AggregateSnapshot,
    pub products: &'a [ProductRecord],
    pub thresholds: &'a Thresholds,
    pub period: Period,
    pub currency_symbol: &'a str,
}

/// A rule evaluator: one optional insight from one snapshot
///
/// Rules are pure. A rule whose trigger does not hold returns `None`.
pub trait Rule: Send + Sync {
    /// Insight type this rule produces
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Insight>;
}

/// Runs registered rules in order and sorts their output by priority
pub struct InsightEngine {
    rules: Vec<Box<dyn Rule>>,
    config: EngineConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules and default thresholds
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with the built-in rules and the given configuration
    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self {
            rules: vec![],
            config,
        };

        // Registration order is the tie-break order for equal priorities
        engine.register(Box::new(BestSellerRule::new()));
        engine.register(Box::new(OutOfStockRule::new()));
        engine.register(Box::new(LowStockRule::new()));
        engine.register(Box::new(SalesTrendRule::new()));
        engine.register(Box::new(RevenueRule::new()));
        engine.register(Box::new(SlowMovingRule::new()));

        engine
    }

    /// Register a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get list of registered insight types
    pub fn insight_types(&self) -> Vec<InsightType> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Generate insights for the context, most urgent first
    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let aggregate = ctx.aggregate();
        self.evaluate(&aggregate, ctx)
    }

    /// Weekday-pattern suggestions; empty when the last 7 days had no sales
    pub fn advise(&self, ctx: &AnalysisContext<'_>) -> Vec<Suggestion> {
        let aggregate = ctx.aggregate();
        self.suggest(&aggregate)
    }

    /// Dashboard figures for the selected period
    pub fn statistics(&self, ctx: &AnalysisContext<'_>) -> StatisticsReport {
        let aggregate = ctx.aggregate();
        let suggestions = self.suggest(&aggregate);
        StatisticsReport::build(&aggregate, ctx, &self.config, suggestions)
    }

    /// Run every rule against an already built aggregate
    pub fn evaluate(
        &self,
        aggregate: &AggregateSnapshot,
        ctx: &AnalysisContext<'_>,
    ) -> Vec<Insight> {
        let rule_ctx = RuleContext {
            aggregate,
            products: ctx.products,
            thresholds: &self.config.thresholds,
            period: ctx.period,
            currency_symbol: &self.config.currency_symbol,
        };

        let mut insights = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let insight = rule.evaluate(&rule_ctx);
            tracing::debug!(
                rule = rule.id().as_str(),
                fired = insight.is_some(),
                "Rule evaluated"
            );
            insights.extend(insight);
        }

        sort_by_priority(&mut insights);
        insights
    }

    fn suggest(&self, aggregate: &AggregateSnapshot) -> Vec<Suggestion> {
        match aggregate.weekdays().busiest() {
            Some(busiest) => advisor::advise(&busiest, &self.config),
            None => vec![],
        }
    }
}

/// Stable sort by priority, most urgent first
///
/// Insights of equal priority keep their relative order.
pub fn sort_by_priority(insights: &mut [Insight]) {
    insights.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
}
