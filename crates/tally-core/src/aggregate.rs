//! Aggregation of windowed sales into per-product, per-day and per-weekday tallies
//!
//! Tallies are kept in maps with a defined iteration order: products in the
//! order they were first sold, days chronologically, weekdays Sunday first.
//! Tie-breaks downstream depend on these orders.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::SaleRecord;
use crate::window::Period;

/// Weekdays in bucket order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Sales of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTally {
    pub product_id: String,
    pub product_name: String,
    /// Number of sale records
    pub sale_count: u32,
    /// Units sold (sum of quantities)
    pub units: u64,
    pub revenue: f64,
}

impl ProductTally {
    fn new(sale: &SaleRecord) -> Self {
        Self {
            product_id: sale.product_id.clone(),
            product_name: sale.product_name.clone(),
            sale_count: 0,
            units: 0,
            revenue: 0.0,
        }
    }

    fn add(&mut self, sale: &SaleRecord) {
        self.sale_count += 1;
        self.units += u64::from(sale.quantity);
        self.revenue += sale.price;
    }
}

/// Sales on one local calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTally {
    pub date: NaiveDate,
    pub sale_count: u32,
    pub revenue: f64,
}

/// Derived statistics over one windowed sale collection
#[derive(Debug, Clone)]
pub struct AggregateSnapshot {
    products: IndexMap<String, ProductTally>,
    days: BTreeMap<NaiveDate, DayTally>,
    sale_count: usize,
    units: u64,
    revenue: f64,
    weekdays: WeekdayPattern,
}

impl AggregateSnapshot {
    /// Aggregate `windowed` sales; the weekday pattern is built from `all_sales`
    /// over its own rolling 7-day window
    pub fn build(
        windowed: &[&SaleRecord],
        all_sales: &[SaleRecord],
        now: &DateTime<FixedOffset>,
    ) -> Self {
        let mut products: IndexMap<String, ProductTally> = IndexMap::new();
        let mut days: BTreeMap<NaiveDate, DayTally> = BTreeMap::new();
        let mut units = 0u64;
        let mut revenue = 0.0;

        for sale in windowed {
            products
                .entry(sale.product_id.clone())
                .or_insert_with(|| ProductTally::new(sale))
                .add(sale);

            let date = sale.timestamp.with_timezone(now.offset()).date_naive();
            let day = days.entry(date).or_insert_with(|| DayTally {
                date,
                sale_count: 0,
                revenue: 0.0,
            });
            day.sale_count += 1;
            day.revenue += sale.price;

            units += u64::from(sale.quantity);
            revenue += sale.price;
        }

        Self {
            products,
            days,
            sale_count: windowed.len(),
            units,
            revenue,
            weekdays: WeekdayPattern::build(all_sales, now),
        }
    }

    /// Product tallies in first-sold order
    pub fn products(&self) -> impl Iterator<Item = &ProductTally> {
        self.products.values()
    }

    pub fn product(&self, product_id: &str) -> Option<&ProductTally> {
        self.products.get(product_id)
    }

    /// Sale records for a product in the window (0 if never sold)
    pub fn sale_count_for(&self, product_id: &str) -> u32 {
        self.products
            .get(product_id)
            .map(|t| t.sale_count)
            .unwrap_or(0)
    }

    /// Product with the most sale records
    ///
    /// Ties go to the product sold first in the window.
    pub fn best_seller(&self) -> Option<&ProductTally> {
        self.products.values().fold(None, |best, tally| match best {
            Some(current) if current.sale_count >= tally.sale_count => Some(current),
            _ => Some(tally),
        })
    }

    /// Top products by revenue, grouped by product name
    ///
    /// Equal revenue keeps first-sold order.
    pub fn top_products(&self, limit: usize) -> Vec<ProductTally> {
        let mut by_name = group_by_name(self.products.values());
        by_name.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        by_name.truncate(limit);
        by_name
    }

    /// Day tallies in chronological order
    pub fn days(&self) -> impl Iterator<Item = &DayTally> {
        self.days.values()
    }

    /// The most recent `n` dates with sales, oldest first
    pub fn last_days(&self, n: usize) -> Vec<&DayTally> {
        let skip = self.days.len().saturating_sub(n);
        self.days.values().skip(skip).collect()
    }

    /// Number of distinct dates with at least one sale
    pub fn distinct_days(&self) -> usize {
        self.days.len()
    }

    pub fn sale_count(&self) -> usize {
        self.sale_count
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    /// Sales per distinct sale day (0 when there were none)
    pub fn average_daily_sales(&self) -> f64 {
        if self.days.is_empty() {
            0.0
        } else {
            self.sale_count as f64 / self.days.len() as f64
        }
    }

    /// Revenue per distinct sale day (0 when there were none)
    pub fn daily_average_revenue(&self) -> f64 {
        if self.days.is_empty() {
            0.0
        } else {
            self.revenue / self.days.len() as f64
        }
    }

    /// Average line total per sale record (0 when there were none)
    pub fn average_transaction(&self) -> f64 {
        if self.sale_count == 0 {
            0.0
        } else {
            self.revenue / self.sale_count as f64
        }
    }

    pub fn weekdays(&self) -> &WeekdayPattern {
        &self.weekdays
    }
}

/// Sales bucketed by weekday over the rolling 7 days before `now`
#[derive(Debug, Clone)]
pub struct WeekdayPattern {
    buckets: [WeekdayBucket; 7],
}

#[derive(Debug, Clone, Default)]
struct WeekdayBucket {
    sale_count: u32,
    revenue: f64,
    products: IndexMap<String, ProductTally>,
}

/// Aggregated detail of the busiest weekday
#[derive(Debug, Clone, PartialEq)]
pub struct BusiestDay {
    pub weekday: Weekday,
    pub sale_count: u32,
    pub revenue: f64,
    /// Products sold that weekday grouped by name, highest revenue first
    pub products: Vec<ProductTally>,
}

impl BusiestDay {
    /// Revenue per transaction (0 when there were none)
    pub fn average_transaction(&self) -> f64 {
        if self.sale_count == 0 {
            0.0
        } else {
            self.revenue / self.sale_count as f64
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

impl WeekdayPattern {
    pub fn build(sales: &[SaleRecord], now: &DateTime<FixedOffset>) -> Self {
        let mut buckets: [WeekdayBucket; 7] = Default::default();

        for sale in sales
            .iter()
            .filter(|s| Period::Week.contains(&s.timestamp, now))
        {
            let weekday = sale.timestamp.with_timezone(now.offset()).weekday();
            let bucket = &mut buckets[weekday.num_days_from_sunday() as usize];
            bucket.sale_count += 1;
            bucket.revenue += sale.price;
            bucket
                .products
                .entry(sale.product_id.clone())
                .or_insert_with(|| ProductTally::new(sale))
                .add(sale);
        }

        Self { buckets }
    }

    /// Sale count for a weekday
    pub fn count(&self, weekday: Weekday) -> u32 {
        self.buckets[weekday.num_days_from_sunday() as usize].sale_count
    }

    /// Weekday with the most sales; ties go to the earliest in Sunday-first order
    pub fn busiest(&self) -> Option<BusiestDay> {
        let mut best: Option<Weekday> = None;
        for weekday in WEEKDAYS {
            let count = self.count(weekday);
            if count == 0 {
                continue;
            }
            match best {
                Some(current) if self.count(current) >= count => {}
                _ => best = Some(weekday),
            }
        }

        let weekday = best?;
        let bucket = &self.buckets[weekday.num_days_from_sunday() as usize];
        let mut products = group_by_name(bucket.products.values());
        products.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Some(BusiestDay {
            weekday,
            sale_count: bucket.sale_count,
            revenue: bucket.revenue,
            products,
        })
    }
}

/// Merge tallies that share a product name, keeping first-seen order
fn group_by_name<'a>(tallies: impl Iterator<Item = &'a ProductTally>) -> Vec<ProductTally> {
    let mut by_name: IndexMap<&str, ProductTally> = IndexMap::new();
    for tally in tallies {
        match by_name.get_mut(tally.product_name.as_str()) {
            Some(merged) => {
                merged.sale_count += tally.sale_count;
                merged.units += tally.units;
                merged.revenue += tally.revenue;
            }
            None => {
                by_name.insert(tally.product_name.as_str(), tally.clone());
            }
        }
    }
    by_name.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> DateTime<FixedOffset> {
        // Monday 2026-10-19 12:00 UTC
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    fn sale(product: &str, price: f64, days_ago: i64) -> SaleRecord {
        let ts = now().with_timezone(&Utc) - Duration::days(days_ago);
        SaleRecord::new("s", product, product, price, ts)
    }

    fn aggregate(sales: &[SaleRecord]) -> AggregateSnapshot {
        let windowed: Vec<&SaleRecord> = sales.iter().collect();
        AggregateSnapshot::build(&windowed, sales, &now())
    }

    #[test]
    fn test_empty_snapshot() {
        let agg = aggregate(&[]);
        assert_eq!(agg.sale_count(), 0);
        assert_eq!(agg.revenue(), 0.0);
        assert_eq!(agg.average_daily_sales(), 0.0);
        assert_eq!(agg.daily_average_revenue(), 0.0);
        assert_eq!(agg.average_transaction(), 0.0);
        assert!(agg.best_seller().is_none());
        assert!(agg.weekdays().busiest().is_none());
    }

    #[test]
    fn test_product_and_day_tallies() {
        let sales = vec![
            sale("Tea", 2000.0, 0),
            sale("Coffee", 5000.0, 1),
            sale("Tea", 2000.0, 1),
            sale("Tea", 2000.0, 3).with_quantity(2),
        ];
        let agg = aggregate(&sales);

        assert_eq!(agg.sale_count(), 4);
        assert_eq!(agg.units(), 5);
        assert_eq!(agg.revenue(), 11000.0);
        assert_eq!(agg.sale_count_for("Tea"), 3);
        assert_eq!(agg.sale_count_for("Missing"), 0);
        assert_eq!(agg.distinct_days(), 3);
        assert!((agg.average_daily_sales() - 4.0 / 3.0).abs() < 1e-9);

        let days: Vec<NaiveDate> = agg.days().map(|d| d.date).collect();
        let mut sorted = days.clone();
        sorted.sort();
        assert_eq!(days, sorted);

        let last = agg.last_days(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].date, now().date_naive());
        assert_eq!(last[1].revenue, 2000.0);
    }

    #[test]
    fn test_best_seller_tie_goes_to_first_sold() {
        let sales = vec![
            sale("Coffee", 5000.0, 0),
            sale("Tea", 2000.0, 0),
            sale("Tea", 2000.0, 0),
            sale("Coffee", 5000.0, 0),
        ];
        let agg = aggregate(&sales);
        assert_eq!(agg.best_seller().unwrap().product_id, "Coffee");
    }

    #[test]
    fn test_units_beyond_u32_range() {
        let sales = vec![
            sale("Tea", 2000.0, 0).with_quantity(u32::MAX),
            sale("Tea", 2000.0, 0).with_quantity(2),
        ];
        let agg = aggregate(&sales);

        let expected = u64::from(u32::MAX) + 2;
        assert_eq!(agg.best_seller().unwrap().units, expected);
        assert_eq!(agg.units(), expected);
        assert_eq!(agg.top_products(1)[0].units, expected);
    }

    #[test]
    fn test_top_products_grouped_by_name() {
        let sales = vec![
            SaleRecord::new("1", "a", "Tea", 1000.0, now().with_timezone(&Utc)),
            SaleRecord::new("2", "b", "Tea", 1500.0, now().with_timezone(&Utc)),
            sale("Coffee", 2000.0, 0),
            sale("Bread", 500.0, 0),
        ];
        let agg = aggregate(&sales);
        let top = agg.top_products(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_name, "Tea");
        assert_eq!(top[0].revenue, 2500.0);
        assert_eq!(top[0].sale_count, 2);
        assert_eq!(top[1].product_name, "Coffee");
    }

    #[test]
    fn test_busiest_weekday() {
        // now is Monday; 1 day ago Sunday, 2 days ago Saturday
        let sales = vec![
            sale("Tea", 1000.0, 1),
            sale("Coffee", 3000.0, 1),
            sale("Tea", 1000.0, 2),
            sale("Tea", 1000.0, 30), // outside the rolling week
            sale("Tea", 1000.0, 37),
            sale("Tea", 1000.0, 44),
        ];
        let agg = aggregate(&sales);
        let busiest = agg.weekdays().busiest().unwrap();

        assert_eq!(busiest.weekday, Weekday::Sun);
        assert_eq!(busiest.sale_count, 2);
        assert_eq!(busiest.revenue, 4000.0);
        assert_eq!(busiest.products[0].product_name, "Coffee");
        assert!(busiest.is_weekend());
        assert_eq!(busiest.average_transaction(), 2000.0);
    }

    #[test]
    fn test_busiest_weekday_tie_goes_to_sunday_first() {
        // Saturday (2 days ago) is seen first in input, Sunday wins the tie
        let sales = vec![sale("Tea", 1000.0, 2), sale("Tea", 1000.0, 1)];
        let agg = aggregate(&sales);
        assert_eq!(agg.weekdays().busiest().unwrap().weekday, Weekday::Sun);

        // Monday vs Tuesday: Monday comes first in Sunday-first order
        let sales = vec![sale("Tea", 1000.0, 6), sale("Tea", 1000.0, 0)];
        let agg = aggregate(&sales);
        assert_eq!(agg.weekdays().busiest().unwrap().weekday, Weekday::Mon);
    }
}
