//! In-memory stores and collectors for service tests.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use nashville_collectors::{Collector, CollectorError};
use nashville_core::{
    EVENTS_PER_PAGE, Event, EventFilter, EventPage, NewEvent, PipelineStats, RawRecord,
    UpsertOutcome,
};
use nashville_storage::StorageError;
use nashville_storage::traits::{AdminStore, EventStore, RawDataStore, SearchStore};
use serde_json::Value;

#[derive(Default)]
pub(crate) struct MemoryStore {
    raw: Mutex<Vec<RawRecord>>,
    events: Mutex<Vec<Event>>,
    failing_urls: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub(crate) fn get_raw_sync(&self, id: i64) -> Option<RawRecord> {
        self.raw.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub(crate) fn raw_labels(&self) -> Vec<String> {
        self.raw.lock().unwrap().iter().map(|r| r.source_spider.clone()).collect()
    }

    pub(crate) fn event_by_url_sync(&self, url: &str) -> Option<Event> {
        self.events.lock().unwrap().iter().find(|e| e.fields.url == url).cloned()
    }

    pub(crate) fn fail_upserts_for(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(url.to_owned());
    }

    pub(crate) fn heal_upserts_for(&self, url: &str) {
        self.failing_urls.lock().unwrap().remove(url);
    }

    pub(crate) fn seed_event(&self, event: NewEvent) -> i64 {
        let mut events = self.events.lock().unwrap();
        let id = i64::try_from(events.len()).unwrap() + 1;
        events.push(Event { id, fields: event });
        id
    }
}

fn matches_text(event: &Event, term: &str) -> bool {
    let term = term.to_lowercase();
    [&event.fields.name, &event.fields.description]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&term))
}

#[async_trait]
impl RawDataStore for MemoryStore {
    async fn append_raw(&self, source_spider: &str, raw_json: &str) -> Result<i64, StorageError> {
        let mut raw = self.raw.lock().unwrap();
        let id = i64::try_from(raw.len()).unwrap() + 1;
        raw.push(RawRecord::new(id, source_spider, raw_json));
        Ok(id)
    }

    async fn append_raw_batch(
        &self,
        source_spider: &str,
        payloads: &[String],
    ) -> Result<usize, StorageError> {
        for payload in payloads {
            self.append_raw(source_spider, payload).await?;
        }
        Ok(payloads.len())
    }

    async fn raw_after(&self, after_id: i64, limit: usize) -> Result<Vec<RawRecord>, StorageError> {
        let raw = self.raw.lock().unwrap();
        Ok(raw.iter().filter(|r| r.id > after_id).take(limit).cloned().collect())
    }

    async fn get_raw(&self, id: i64) -> Result<Option<RawRecord>, StorageError> {
        Ok(self.get_raw_sync(id))
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, event: &NewEvent) -> Result<i64, StorageError> {
        if self.event_by_url_sync(&event.url).is_some() {
            return Err(StorageError::Duplicate(event.url.clone()));
        }
        Ok(self.seed_event(event.clone()))
    }

    async fn upsert_event(&self, event: &NewEvent) -> Result<UpsertOutcome, StorageError> {
        if self.failing_urls.lock().unwrap().contains(&event.url) {
            return Err(StorageError::Migration("injected failure".to_owned()));
        }
        let mut events = self.events.lock().unwrap();
        if let Some(existing) = events.iter_mut().find(|e| e.fields.url == event.url) {
            existing.fields = event.clone();
            return Ok(UpsertOutcome::Updated);
        }
        let id = i64::try_from(events.len()).unwrap() + 1;
        events.push(Event { id, fields: event.clone() });
        Ok(UpsertOutcome::Inserted)
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, StorageError> {
        Ok(self.events.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn get_event_by_url(&self, url: &str) -> Result<Option<Event>, StorageError> {
        Ok(self.event_by_url_sync(url))
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn list_events(&self, filter: &EventFilter) -> Result<EventPage, StorageError> {
        let mut matching: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| filter.source.as_ref().is_none_or(|s| e.fields.source.as_ref() == Some(s)))
            .filter(|e| {
                filter.category.as_ref().is_none_or(|c| e.fields.category.as_ref() == Some(c))
            })
            .filter(|e| filter.search_term().is_none_or(|t| matches_text(e, t)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            (&a.fields.event_date, &a.fields.name).cmp(&(&b.fields.event_date, &b.fields.name))
        });
        let total = matching.len();
        let events = matching.into_iter().skip(filter.offset()).take(EVENTS_PER_PAGE).collect();
        Ok(EventPage::new(events, total, filter.page.max(1)))
    }

    async fn search_events(&self, query: &str, limit: usize) -> Result<Vec<Event>, StorageError> {
        let events = self.events.lock().unwrap();
        Ok(events.iter().filter(|e| matches_text(e, query)).take(limit).cloned().collect())
    }

    async fn list_sources(&self) -> Result<Vec<String>, StorageError> {
        let mut sources: Vec<String> =
            self.events.lock().unwrap().iter().filter_map(|e| e.fields.source.clone()).collect();
        sources.sort();
        sources.dedup();
        Ok(sources)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StorageError> {
        let mut categories: Vec<String> =
            self.events.lock().unwrap().iter().filter_map(|e| e.fields.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn stats(&self) -> Result<PipelineStats, StorageError> {
        Ok(PipelineStats {
            raw_records: i64::try_from(self.raw.lock().unwrap().len()).unwrap(),
            events: i64::try_from(self.events.lock().unwrap().len()).unwrap(),
        })
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        self.raw.lock().unwrap().clear();
        self.events.lock().unwrap().clear();
        Ok(())
    }
}

/// Collector returning a fixed list of captures.
pub(crate) struct StaticCollector {
    label: String,
    items: Vec<Value>,
}

impl StaticCollector {
    pub(crate) fn new(label: &str, items: Vec<Value>) -> Self {
        Self { label: label.to_owned(), items }
    }
}

#[async_trait]
impl Collector for StaticCollector {
    fn label(&self) -> &str {
        &self.label
    }

    async fn collect(&self) -> Result<Vec<Value>, CollectorError> {
        Ok(self.items.clone())
    }
}
