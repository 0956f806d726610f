//! Client-side filter enums for list views
//!
//! Filters run over the rows already fetched for the current page; they
//! never change what is requested from the server.

use chrono::{DateTime, Datelike, Duration, Utc};
use clap::ValueEnum;

use crate::core::entity::Status;
use crate::entities::inventory::StockLevel;

/// Status filter for the sample request list
///
/// Compared against a request's current status (its first item's status).
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status - default
    #[default]
    All,
    Requested,
    InSampling,
    Sent,
    Approved,
    Rejected,
}

impl StatusFilter {
    /// Check if a Status matches this filter
    pub fn matches(&self, status: &Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Requested => *status == Status::Requested,
            StatusFilter::InSampling => *status == Status::InSampling,
            StatusFilter::Sent => *status == Status::Sent,
            StatusFilter::Approved => *status == Status::Approved,
            StatusFilter::Rejected => *status == Status::Rejected,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Requested => write!(f, "requested"),
            StatusFilter::InSampling => write!(f, "in-sampling"),
            StatusFilter::Sent => write!(f, "sent"),
            StatusFilter::Approved => write!(f, "approved"),
            StatusFilter::Rejected => write!(f, "rejected"),
        }
    }
}

/// Required-by date filter
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// Any date - default
    #[default]
    All,
    /// Within 7 days of now, before or after
    ThisWeek,
    /// Same calendar year and month as now (UTC)
    ThisMonth,
}

impl DateFilter {
    /// Check if `date` matches this filter relative to `now`
    pub fn matches(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::ThisWeek => {
                let window = Duration::days(7);
                let delta = date - now;
                delta <= window && delta >= -window
            }
            DateFilter::ThisMonth => date.year() == now.year() && date.month() == now.month(),
        }
    }
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateFilter::All => write!(f, "all"),
            DateFilter::ThisWeek => write!(f, "this-week"),
            DateFilter::ThisMonth => write!(f, "this-month"),
        }
    }
}

/// Exact-match filter on a name column; `All` disables it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameFilter {
    #[default]
    All,
    Exact(String),
}

impl NameFilter {
    /// `None` or an empty/`ALL` value means no filtering
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => NameFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => NameFilter::All,
            Some(v) => NameFilter::Exact(v.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::Exact(name) => name == value,
        }
    }
}

impl std::fmt::Display for NameFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameFilter::All => write!(f, "all"),
            NameFilter::Exact(name) => write!(f, "{}", name),
        }
    }
}

/// Stock band filter for the inventory list
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StockFilter {
    /// Any stock level - default
    #[default]
    All,
    /// 50 m or less
    Low,
    /// Over 50 m, up to 100 m
    Medium,
    /// Over 100 m
    High,
}

impl StockFilter {
    pub fn matches(&self, level: StockLevel) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::Low => level == StockLevel::Low,
            StockFilter::Medium => level == StockLevel::Medium,
            StockFilter::High => level == StockLevel::High,
        }
    }
}

impl std::fmt::Display for StockFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockFilter::All => write!(f, "all"),
            StockFilter::Low => write!(f, "low"),
            StockFilter::Medium => write!(f, "medium"),
            StockFilter::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::Sent.matches(&Status::Sent));
        assert!(!StatusFilter::Sent.matches(&Status::Approved));
        assert!(StatusFilter::All.matches(&Status::Rejected));
    }

    #[test]
    fn test_this_week_is_symmetric() {
        let now = at(2026, 3, 15);
        assert!(DateFilter::ThisWeek.matches(at(2026, 3, 22), now));
        assert!(DateFilter::ThisWeek.matches(at(2026, 3, 8), now));
        assert!(!DateFilter::ThisWeek.matches(at(2026, 3, 23), now));
        assert!(!DateFilter::ThisWeek.matches(at(2026, 3, 7), now));
    }

    #[test]
    fn test_this_month_uses_calendar_month() {
        let now = at(2026, 3, 31);
        assert!(DateFilter::ThisMonth.matches(at(2026, 3, 1), now));
        assert!(!DateFilter::ThisMonth.matches(at(2026, 4, 1), now));
        assert!(!DateFilter::ThisMonth.matches(at(2025, 3, 15), now));
        assert!(DateFilter::All.matches(at(1999, 1, 1), now));
    }

    #[test]
    fn test_name_filter() {
        assert_eq!(NameFilter::from_option(None), NameFilter::All);
        assert_eq!(NameFilter::from_option(Some("ALL")), NameFilter::All);
        let acme = NameFilter::from_option(Some("Acme Co."));
        assert!(acme.matches("Acme Co."));
        assert!(!acme.matches("acme co."));
    }

    #[test]
    fn test_stock_filter() {
        assert!(StockFilter::Low.matches(StockLevel::Low));
        assert!(!StockFilter::High.matches(StockLevel::Medium));
        assert!(StockFilter::All.matches(StockLevel::High));
    }
}
