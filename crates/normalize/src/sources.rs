//! Per-source mapping from a raw payload to a [`NewEvent`].

use nashville_core::{NewEvent, RawRecord};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::categorizer::categorize_event;
use crate::standardizer::{standardize_date, standardize_venue_name};
use crate::text::title_case;

/// Spiders whose own category labels are kept as-is.
pub const TRUSTED_SPIDERS: &[&str] = &["nashville_arcgis", "ticketmaster", "yelp", "google_places"];

/// Why a raw record produced no event. Skips are expected and not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("raw_json is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("raw_json is not a JSON object")]
    NotAnObject,
    #[error("record has no name")]
    MissingName,
    #[error("record has no venue name")]
    MissingVenue,
    #[error("record has no url")]
    MissingUrl,
}

/// Label shown to users for a spider that has no dedicated transform.
#[must_use]
pub fn display_source(spider: &str) -> &str {
    match spider {
        "nashville.com-events" => "Nashville Events",
        "nashville.com-hotels" => "Nashville Hotels",
        "underdog" => "Underdog Venue",
        "seatgeek" => "SeatGeek",
        other => other,
    }
}

/// Map one staged record to a normalized event.
pub fn normalize_record(record: &RawRecord) -> Result<NewEvent, SkipReason> {
    let value: Value = serde_json::from_str(&record.raw_json)
        .map_err(|e| SkipReason::InvalidJson(e.to_string()))?;
    let Value::Object(payload) = value else {
        return Err(SkipReason::NotAnObject);
    };
    let spider = record.source_spider.as_str();

    let mut event = match spider {
        "nashville_arcgis" => place_event(&payload, "Nashville ArcGIS", "Civic Facility")?,
        "ticketmaster" => listing_event(&payload, "Ticketmaster", "Event", true)?,
        "yelp" => place_event(&payload, "Yelp", "Business")?,
        "google_places" => place_event(&payload, "Google Places", "Attraction")?,
        other => listing_event(&payload, display_source(other), "General", false)?,
    };

    standardize(&mut event, spider);
    if !TRUSTED_SPIDERS.contains(&spider) {
        categorize(&mut event);
    }
    Ok(event)
}

/// Venue-like records (businesses, facilities): the venue is the place itself.
fn place_event(
    payload: &Map<String, Value>,
    source: &str,
    default_category: &str,
) -> Result<NewEvent, SkipReason> {
    let name = text(payload, "name").ok_or(SkipReason::MissingName)?;
    let url = text(payload, "url").ok_or(SkipReason::MissingUrl)?;

    Ok(NewEvent {
        url,
        venue_name: Some(name.clone()),
        name: Some(name),
        venue_address: text(payload, "venue_address"),
        description: text(payload, "description"),
        source: Some(source.to_owned()),
        category: Some(category_label(payload, default_category)),
        latitude: coordinate(payload, "latitude"),
        longitude: coordinate(payload, "longitude"),
        ..NewEvent::default()
    })
}

/// Dated listings (concerts, shows) with their own venue fields.
fn listing_event(
    payload: &Map<String, Value>,
    source: &str,
    default_category: &str,
    require_venue: bool,
) -> Result<NewEvent, SkipReason> {
    let name = text(payload, "name").ok_or(SkipReason::MissingName)?;
    let venue_name = text(payload, "venue_name");
    if require_venue && venue_name.is_none() {
        return Err(SkipReason::MissingVenue);
    }
    let url = text(payload, "url").ok_or(SkipReason::MissingUrl)?;

    Ok(NewEvent {
        url,
        name: Some(name),
        event_date: text(payload, "event_date"),
        venue_name,
        venue_address: text(payload, "venue_address"),
        description: text(payload, "description"),
        source: Some(source.to_owned()),
        category: Some(category_label(payload, default_category)),
        genre: text(payload, "genre"),
        season: text(payload, "season"),
        latitude: coordinate(payload, "latitude"),
        longitude: coordinate(payload, "longitude"),
    })
}

fn standardize(event: &mut NewEvent, spider: &str) {
    event.event_date = event.event_date.take().and_then(|d| standardize_date(&d, spider));
    event.venue_name = event.venue_name.take().and_then(|v| standardize_venue_name(&v));
}

/// Keyword categorization for untrusted sources. Overrides whatever category
/// and genre the payload carried.
fn categorize(event: &mut NewEvent) {
    let (category, genre) = categorize_event(
        event.name.as_deref().unwrap_or_default(),
        event.description.as_deref().unwrap_or_default(),
        event.venue_name.as_deref().unwrap_or_default(),
    );
    event.category = Some(category.to_owned());
    event.genre = genre.map(str::to_owned);
}

/// Payload category, or the source default, with `_` spaced and title-cased.
fn category_label(payload: &Map<String, Value>, default: &str) -> String {
    let raw = text(payload, "category").unwrap_or_else(|| default.to_owned());
    title_case(&raw.replace('_', " "))
}

/// String field; numbers are rendered, blanks and other types are absent.
fn text(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, reason = "coordinates are stored as REAL")]
fn coordinate(payload: &Map<String, Value>, key: &str) -> Option<f32> {
    let parsed = match payload.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => {
            let parsed = s.trim().parse::<f64>().ok();
            if parsed.is_none() {
                tracing::warn!(key, value = %s, "skipping unparsable coordinate");
            }
            parsed
        },
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).map(|v| v as f32)
}
