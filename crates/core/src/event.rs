use serde::{Deserialize, Serialize};

use crate::EVENTS_PER_PAGE;

/// Normalized event ready to be written to `events`.
///
/// `url` is the upsert key; every other field is descriptive and nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub url: String,
    pub name: Option<String>,
    pub event_date: Option<String>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub season: Option<String>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
}

impl NewEvent {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn event_date(mut self, date: impl Into<String>) -> Self {
        self.event_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn venue(mut self, name: impl Into<String>, address: Option<String>) -> Self {
        self.venue_name = Some(name.into());
        self.venue_address = address;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Event as stored, including its surrogate key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewEvent,
}

/// Whether an upsert created the row or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Listing filter for the events table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub source: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    /// 1-based page number.
    pub page: usize,
}

impl EventFilter {
    #[must_use]
    pub fn page(page: usize) -> Self {
        Self { page, ..Self::default() }
    }

    /// Row offset of the requested page. Page 0 is treated as page 1.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(EVENTS_PER_PAGE)
    }

    /// Search term with surrounding whitespace removed; `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One page of listed events plus the totals needed for pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total_events: usize,
    pub total_pages: usize,
    pub page: usize,
    pub per_page: usize,
}

impl EventPage {
    #[must_use]
    pub fn new(events: Vec<Event>, total_events: usize, page: usize) -> Self {
        Self {
            events,
            total_events,
            total_pages: total_pages(total_events, EVENTS_PER_PAGE),
            page,
            per_page: EVENTS_PER_PAGE,
        }
    }
}

/// Ceiling division used for page counts.
#[must_use]
pub const fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 { 0 } else { total.div_ceil(per_page) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based_per_page() {
        assert_eq!(EventFilter::page(1).offset(), 0);
        assert_eq!(EventFilter::page(3).offset(), 50);
        assert_eq!(EventFilter::page(0).offset(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 25), 0);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn blank_search_term_is_none() {
        let filter = EventFilter { search: Some("   ".to_owned()), ..EventFilter::page(1) };
        assert_eq!(filter.search_term(), None);
        let filter = EventFilter { search: Some(" jazz ".to_owned()), ..EventFilter::page(1) };
        assert_eq!(filter.search_term(), Some("jazz"));
    }

    #[test]
    fn event_serializes_flat() {
        let event = Event { id: 7, fields: NewEvent::new("https://x/1").name("Jazz Night") };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["url"], "https://x/1");
        assert_eq!(json["name"], "Jazz Night");
        assert!(json["genre"].is_null());
    }
}
