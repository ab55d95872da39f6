//! Window selection - restricts sales to an analysis period
//!
//! Every boundary is computed from an explicit reference `now`. Its UTC
//! offset defines what "local" means for calendar-based periods.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc,
};

use crate::error::Error;
use crate::models::SaleRecord;

/// Length of the rolling week window
pub const ROLLING_WEEK_DAYS: i64 = 7;

/// Analysis period used to filter sales before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Since the start of the current local day
    Today,
    /// The last 7 days, rolling from `now`
    #[default]
    Week,
    /// Since the first day of the current local month
    Month,
    /// Since the first day of the current local year
    Year,
    /// Between two local dates, both inclusive
    ///
    /// When either bound is missing no filtering happens at all.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Custom { .. } => "custom",
        }
    }

    /// Human-readable label for headings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "This Month",
            Self::Year => "This Year",
            Self::Custom { .. } => "Custom Period",
        }
    }

    /// Phrase that completes sentences like "10 sales ..."
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "in the last 7 days",
            Self::Month => "this month",
            Self::Year => "this year",
            Self::Custom { .. } => "in the selected period",
        }
    }

    /// Build a period from a tag plus optional custom bounds
    pub fn from_parts(
        tag: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, Error> {
        match tag.parse::<Period>()? {
            Self::Custom { .. } => Ok(Self::Custom { start, end }),
            other => Ok(other),
        }
    }

    /// Whether a sale made at `timestamp` falls in this period
    pub fn contains(&self, timestamp: &DateTime<Utc>, now: &DateTime<FixedOffset>) -> bool {
        let local = timestamp.with_timezone(now.offset()).naive_local();
        let today = now.date_naive();

        match self {
            Self::Today => local >= start_of(today),
            Self::Week => *timestamp >= *now - Duration::days(ROLLING_WEEK_DAYS),
            Self::Month => {
                let first = today - Duration::days(i64::from(today.day0()));
                local >= start_of(first)
            }
            Self::Year => {
                let first = today - Duration::days(i64::from(today.ordinal0()));
                local >= start_of(first)
            }
            Self::Custom {
                start: Some(start),
                end: Some(end),
            } => {
                let date = local.date();
                date >= *start && date <= *end
            }
            Self::Custom { .. } => true,
        }
    }

    /// Return the sales that fall in this period, preserving input order
    pub fn select<'a>(
        &self,
        sales: &'a [SaleRecord],
        now: &DateTime<FixedOffset>,
    ) -> Vec<&'a SaleRecord> {
        let selected: Vec<&SaleRecord> = sales
            .iter()
            .filter(|sale| self.contains(&sale.timestamp, now))
            .collect();

        tracing::debug!(
            period = self.as_str(),
            total = sales.len(),
            selected = selected.len(),
            "Selected sales window"
        );

        selected
    }
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Self::Today),
            "week" | "7d" | "last-7-days" => Ok(Self::Week),
            "month" | "this-month" => Ok(Self::Month),
            "year" | "this-year" => Ok(Self::Year),
            "custom" => Ok(Self::Custom {
                start: None,
                end: None,
            }),
            _ => Err(Error::InvalidPeriod(format!(
                "Unknown period: {}. Available: today, week, month, year, custom",
                s
            ))),
        }
    }
}
