//! Insight and statistics command implementations

use std::path::Path;

use anyhow::Result;
use tally_core::{format_currency, Insight, InsightEngine, Priority, StatisticsReport};

use super::{load_config, load_snapshot, SnapshotInput};

/// Run the rule engine over a snapshot and return its insights
pub fn run_insights(config_path: Option<&Path>, input: &SnapshotInput<'_>) -> Result<Vec<Insight>> {
    let (config, _) = load_config(config_path)?;
    let snapshot = load_snapshot(input, &config)?;
    let engine = InsightEngine::with_config(config);
    Ok(engine.analyze(&snapshot.context()))
}

/// Compute the statistics report for a snapshot
pub fn run_stats(
    config_path: Option<&Path>,
    input: &SnapshotInput<'_>,
) -> Result<(StatisticsReport, String)> {
    let (config, _) = load_config(config_path)?;
    let snapshot = load_snapshot(input, &config)?;
    let currency = config.currency_symbol.clone();
    let engine = InsightEngine::with_config(config);
    Ok((engine.statistics(&snapshot.context()), currency))
}

pub fn cmd_insights(
    config_path: Option<&Path>,
    input: &SnapshotInput<'_>,
    json: bool,
) -> Result<()> {
    let insights = run_insights(config_path, input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("💡 Insights");
    println!("   ─────────────────────────────");

    if insights.is_empty() {
        println!("   ✅ Nothing to report for this period");
        return Ok(());
    }

    for insight in &insights {
        println!(
            "   {} [{}] {}",
            priority_icon(insight.priority),
            insight.priority,
            insight.title
        );
        println!("      {}", insight.message);
        println!("      → {}", insight.recommendation);
        println!();
    }

    Ok(())
}

pub fn cmd_stats(config_path: Option<&Path>, input: &SnapshotInput<'_>, json: bool) -> Result<()> {
    let (report, currency) = run_stats(config_path, input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let money = |v: f64| format_currency(&currency, v);

    println!("📊 Statistics · {}", report.period_label);
    println!("   ─────────────────────────────");
    println!("   Revenue:          {}", money(report.total_revenue));
    println!("   Transactions:     {}", report.total_transactions);
    println!("   Units sold:       {}", report.units_sold);
    println!("   Avg transaction:  {}", money(report.average_transaction));
    println!("   Products:         {}", report.product_count);

    if !report.top_products.is_empty() {
        println!();
        println!("🏆 Top Products");
        for (i, product) in report.top_products.iter().enumerate() {
            println!(
                "   {}. {:<24} {} ({} sales)",
                i + 1,
                product.product_name,
                money(product.revenue),
                product.sale_count
            );
        }
    }

    if !report.daily_revenue.is_empty() {
        println!();
        println!("📅 Daily Revenue");
        for day in &report.daily_revenue {
            println!(
                "   {}  {} ({} sales)",
                day.date,
                money(day.revenue),
                day.sale_count
            );
        }
    }

    if let Some(busiest) = &report.busiest_day {
        println!();
        println!(
            "📆 Busiest day (last 7 days): {} - {} transactions, {}",
            busiest.day,
            busiest.total_transactions,
            money(busiest.total_revenue)
        );
    }

    if !report.suggestions.is_empty() {
        println!();
        println!("💬 Suggestions");
        for suggestion in &report.suggestions {
            println!("   • {}: {}", suggestion.title, suggestion.content);
        }
    }

    Ok(())
}

fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}
