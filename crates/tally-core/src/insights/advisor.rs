//! Weekday advisor - suggestions built around the busiest day of the last week

use crate::aggregate::BusiestDay;
use crate::config::EngineConfig;
use crate::format::format_currency;

use super::types::{Suggestion, SuggestionKind};

/// Suggestions for the busiest weekday, in a fixed order:
/// schedule, product focus, pricing or volume, diversity
pub fn advise(busiest: &BusiestDay, config: &EngineConfig) -> Vec<Suggestion> {
    let t = &config.thresholds;
    let day = config.weekday_names.name(busiest.weekday);
    let mut suggestions = Vec::with_capacity(4);

    if busiest.is_weekend() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Schedule,
            "Weekend Schedule",
            format!(
                "{} is your busiest day. Make sure best sellers are well stocked \
                 and consider longer opening hours on weekends.",
                day
            ),
        ));
    } else {
        suggestions.push(Suggestion::new(
            SuggestionKind::Schedule,
            "Weekday Pattern",
            format!(
                "{} shows strong weekday activity. Use the momentum for special \
                 promotions or product bundles.",
                day
            ),
        ));
    }

    if let Some(top) = busiest.products.first() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Product,
            "Focus on Top Product",
            format!(
                "{} is the best seller on {} with {} {}. Keep it in stock at all \
                 times and consider variants or bundles.",
                top.product_name,
                day,
                top.sale_count,
                if top.sale_count == 1 { "sale" } else { "sales" }
            ),
        ));
    }

    let average = busiest.average_transaction();
    let average_text = format_currency(&config.currency_symbol, average);
    if average > t.premium_transaction_above {
        suggestions.push(Suggestion::new(
            SuggestionKind::Pricing,
            "Premium Strategy",
            format!(
                "An average transaction of {} shows customers are willing to pay \
                 more. Consider higher margins or premium products.",
                average_text
            ),
        ));
    } else {
        suggestions.push(Suggestion::new(
            SuggestionKind::Volume,
            "Volume Strategy",
            format!(
                "With an average transaction of {}, grow sales volume through \
                 bundle promotions or quantity discounts.",
                average_text
            ),
        ));
    }

    if busiest.products.len() >= t.diverse_products_min {
        suggestions.push(Suggestion::new(
            SuggestionKind::Diversity,
            "Diversification Success",
            format!(
                "You sold {} different products on {}. Keep the variety and look \
                 for cross-selling opportunities.",
                busiest.products.len(),
                day
            ),
        ));
    }

    tracing::debug!(
        weekday = day,
        count = suggestions.len(),
        "Advisor suggestions built"
    );

    suggestions
}
