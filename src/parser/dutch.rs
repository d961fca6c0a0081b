//! Dutch date and time token parsing for the bulk-import pipeline.
//!
//! Listings are pasted as semi-structured Dutch text; dates appear as
//! abbreviated-weekday lines ("za 12 juli 2025") and opening hours as a
//! start-end range ("10:00 - 16:00"). Lookups fail silently with `None`;
//! the caller treats a missing date as a failed block.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Weekday-date line: abbreviated weekday, day number, month name, 4-digit year.
/// The weekday token is required by the pattern but carries no meaning beyond it.
static RE_DATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(ma|di|wo|do|vr|za|zo)\.?\s+(\d{1,2})\s+([a-zëéè]+)\.?\s+(\d{4})\b").unwrap()
});

/// Opening-hours range, lenient on a missing leading zero ("9:00 - 16:00").
static RE_TIME_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\b").unwrap());

/// Map a Dutch month name (full or 3-letter abbreviation) to its month number.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.trim().trim_end_matches('.').to_lowercase().as_str() {
        "januari" | "jan" => 1,
        "februari" | "feb" => 2,
        "maart" | "mrt" => 3,
        "april" | "apr" => 4,
        "mei" => 5,
        "juni" | "jun" => 6,
        "juli" | "jul" => 7,
        "augustus" | "aug" => 8,
        "september" | "sep" => 9,
        "oktober" | "okt" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Check whether a line looks like a weekday-date line.
pub fn is_date_line(line: &str) -> bool {
    RE_DATE_LINE.is_match(line)
}

/// Extract a calendar date from a weekday-date line.
///
/// Returns `None` when the pattern does not match, the month name is unknown,
/// or the day number is out of range for the month.
pub fn parse_date_line(line: &str) -> Option<NaiveDate> {
    let caps = RE_DATE_LINE.captures(line)?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let month = month_number(caps.get(3)?.as_str())?;
    let year: i32 = caps.get(4)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Check whether a line contains an opening-hours range.
pub fn is_time_line(line: &str) -> bool {
    RE_TIME_RANGE.is_match(line)
}

/// Extract (start, end) times of day from an opening-hours range.
pub fn parse_time_range(line: &str) -> Option<(NaiveTime, NaiveTime)> {
    let caps = RE_TIME_RANGE.captures(line)?;
    let sh: u32 = caps.get(1)?.as_str().parse().ok()?;
    let sm: u32 = caps.get(2)?.as_str().parse().ok()?;
    let eh: u32 = caps.get(3)?.as_str().parse().ok()?;
    let em: u32 = caps.get(4)?.as_str().parse().ok()?;
    let start = NaiveTime::from_hms_opt(sh, sm, 0)?;
    let end = NaiveTime::from_hms_opt(eh, em, 0)?;
    Some((start, end))
}
