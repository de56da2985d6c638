//! Field standardization: dates, venue names and prices.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use regex::Regex;

use crate::text::{collapse_whitespace, title_case};

static NASHVILLE_COM_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\w+\s\d+)\s*@\s*([\d:]+\s*[ap]m)").expect("valid regex")
});
static US_ZONE_ABBREV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(CDT|CST|EDT|EST)").expect("valid regex"));
static VENUE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(venue|hall|theater|theatre)$").expect("valid regex"));
static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));

/// Standard (non-DST) UTC offsets, in hours west of UTC.
const CENTRAL_STANDARD_WEST: i32 = 6;
const EASTERN_STANDARD_WEST: i32 = 5;

/// Normalize a source-specific date string to ISO-8601.
///
/// Uses the current local year for formats that omit it.
#[must_use]
pub fn standardize_date(raw: &str, spider: &str) -> Option<String> {
    standardize_date_in_year(raw, spider, Local::now().year())
}

/// [`standardize_date`] with an explicit year for year-less formats.
#[must_use]
pub fn standardize_date_in_year(raw: &str, spider: &str, year: i32) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    match spider {
        "ticketmaster" | "seatgeek" => {
            if let Some(iso) = parse_iso(&raw.replace(' ', "T")) {
                return Some(iso);
            }
        },
        "underdog" => return parse_underdog(raw),
        "yelp" => return None,
        s if s.contains("nashville.com") => {
            if let Some(iso) = parse_nashville_com(raw, year) {
                return Some(iso);
            }
        },
        _ => {},
    }
    Some(raw.to_owned())
}

fn parse_iso(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.to_rfc3339());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.format("%Y-%m-%dT%H:%M:%S").to_string());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// `"June 5 @ 7:30 pm"`, localized to US Central time.
fn parse_nashville_com(raw: &str, year: i32) -> Option<String> {
    let caps = NASHVILLE_COM_DATE.captures(raw)?;
    let date_part = caps.get(1)?.as_str();
    let time_part = caps.get(2)?.as_str();
    let full = format!("{date_part} {year} {time_part}");
    let naive = NaiveDateTime::parse_from_str(&full, "%B %d %Y %I:%M %p").ok()?;
    localize_us(naive, CENTRAL_STANDARD_WEST)
}

/// `"May 1, 2024 | 8:00PM CDT"`. Unparsable values are dropped.
fn parse_underdog(raw: &str) -> Option<String> {
    let mut parts = raw.split('|');
    let (Some(date_part), Some(time_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        tracing::warn!(raw, "underdog date is not '<date> | <time>'");
        return None;
    };
    let date_part = date_part.trim();
    let time_part = time_part.trim();

    let zone = US_ZONE_ABBREV.find(time_part).map_or("CST", |m| m.as_str());
    let standard_west = match zone {
        "EDT" | "EST" => EASTERN_STANDARD_WEST,
        _ => CENTRAL_STANDARD_WEST,
    };
    let mut time_clean: String =
        time_part.replace(zone, "").chars().filter(|c| !c.is_whitespace()).collect();
    if !time_clean.contains(':') {
        if let Some(meridiem) = time_clean.find(|c: char| c.is_ascii_alphabetic()) {
            time_clean.insert_str(meridiem, ":00");
        }
    }

    let date = NaiveDate::parse_from_str(date_part, "%B %d, %Y");
    let time = NaiveTime::parse_from_str(&time_clean, "%I:%M%p");
    match (date, time) {
        (Ok(date), Ok(time)) => localize_us(date.and_time(time), standard_west),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(raw, error = %e, "failed to parse underdog date");
            None
        },
    }
}

/// Attach the US offset in force at `naive` local time for a zone whose
/// standard offset is `standard_west` hours west of UTC.
///
/// DST runs from 02:00 on the second Sunday of March to 02:00 on the first
/// Sunday of November.
fn localize_us(naive: NaiveDateTime, standard_west: i32) -> Option<String> {
    let west = if is_us_dst(naive) { standard_west - 1 } else { standard_west };
    let offset = FixedOffset::west_opt(west * 3600)?;
    offset.from_local_datetime(&naive).single().map(|dt| dt.to_rfc3339())
}

fn is_us_dst(naive: NaiveDateTime) -> bool {
    let year = naive.year();
    let two_am = NaiveTime::from_hms_opt(2, 0, 0).unwrap_or(NaiveTime::MIN);
    let start = NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Sun, 2);
    let end = NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Sun, 1);
    match (start, end) {
        (Some(start), Some(end)) => naive >= start.and_time(two_am) && naive < end.and_time(two_am),
        _ => false,
    }
}

/// Tidy a venue name: collapse whitespace, drop a trailing generic word
/// (venue, hall, theater, theatre) and title-case the rest.
#[must_use]
pub fn standardize_venue_name(name: &str) -> Option<String> {
    let collapsed = collapse_whitespace(name);
    if collapsed.is_empty() {
        return None;
    }
    let stripped = VENUE_SUFFIX.replace(&collapsed, "");
    Some(title_case(&stripped))
}

/// Parse a price label. "Free" anywhere means 0.0, otherwise the first number.
#[must_use]
pub fn standardize_price(price: &str) -> Option<f64> {
    if price.is_empty() {
        return None;
    }
    if price.to_lowercase().contains("free") {
        return Some(0.0);
    }
    PRICE_NUMBER.find(price).and_then(|m| m.as_str().parse().ok())
}
