//! Shared helper functions for CLI commands

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Format a string ID for display, truncating if too long
///
/// Backend IDs are 24-character hex strings; tables show the first 10.
pub fn format_short_id(id: &str) -> String {
    if id.chars().count() > 12 {
        format!("{}…", id.chars().take(10).collect::<String>())
    } else {
        id.to_string()
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Meters with trailing zeros trimmed, e.g. `120 m`, `75.5 m`
pub fn format_meters(meters: Decimal) -> String {
    format!("{} m", meters.normalize())
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse a decimal meters argument
pub fn parse_meters(s: &str) -> Result<Decimal, String> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| format!("invalid meters '{}'", s))
}

/// Parse an `<ID>=<METERS>` item argument
pub fn parse_item_spec(s: &str) -> Result<(String, Decimal), String> {
    let (id, meters) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid item '{}', expected <INVENTORY_ID>=<METERS>", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("invalid item '{}', missing inventory ID", s));
    }
    Ok((id.to_string(), parse_meters(meters)?))
}
