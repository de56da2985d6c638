use std::sync::Arc;

use nashville_core::{Event, EventFilter, EventPage, MAX_QUERY_LIMIT, PipelineStats};
use nashville_storage::traits::{AdminStore, EventStore, SearchStore};

use crate::ServiceError;

/// Read side of the pipeline plus the administrative reset.
pub struct EventService {
    events: Arc<dyn EventStore>,
    search: Arc<dyn SearchStore>,
    admin: Arc<dyn AdminStore>,
}

impl EventService {
    #[must_use]
    pub fn new(
        events: Arc<dyn EventStore>,
        search: Arc<dyn SearchStore>,
        admin: Arc<dyn AdminStore>,
    ) -> Self {
        Self { events, search, admin }
    }

    /// One listing page. Pages start at 1.
    pub async fn list(&self, filter: &EventFilter) -> Result<EventPage, ServiceError> {
        if filter.page == 0 {
            return Err(ServiceError::InvalidInput("page must be at least 1".to_owned()));
        }
        Ok(self.search.list_events(filter).await?)
    }

    /// Ranked keyword search. A blank query matches nothing.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Event>, ServiceError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.search.search_events(query, limit.min(MAX_QUERY_LIMIT)).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Event>, ServiceError> {
        Ok(self.events.get_event(id).await?)
    }

    pub async fn get_by_url(&self, url: &str) -> Result<Option<Event>, ServiceError> {
        Ok(self.events.get_event_by_url(url).await?)
    }

    pub async fn sources(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.search.list_sources().await?)
    }

    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.search.list_categories().await?)
    }

    pub async fn stats(&self) -> Result<PipelineStats, ServiceError> {
        Ok(self.admin.stats().await?)
    }

    /// Empty both tables. Irreversible.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.admin.clear_all().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nashville_core::NewEvent;

    use super::*;
    use crate::memory_store::MemoryStore;

    fn service_with(store: &Arc<MemoryStore>) -> EventService {
        EventService::new(store.clone(), store.clone(), store.clone())
    }

    fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::default());
        store.seed_event(
            NewEvent::new("https://x/1")
                .name("Jazz Night")
                .event_date("2025-06-02T20:00:00")
                .source("SeatGeek")
                .category("Music"),
        );
        store.seed_event(
            NewEvent::new("https://x/2")
                .name("Open Mic")
                .event_date("2025-06-01T19:00:00")
                .description("Bring your jazz standards")
                .source("Ticketmaster")
                .category("Music"),
        );
        store.seed_event(NewEvent::new("https://x/3").name("Laugh Riot").category("Comedy"));
        store
    }

    #[tokio::test]
    async fn page_zero_is_invalid() {
        let service = service_with(&seeded());
        let err = service.list(&EventFilter::page(0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let service = service_with(&seeded());
        let filter = EventFilter { category: Some("Music".to_owned()), ..EventFilter::page(1) };
        let page = service.list(&filter).await.unwrap();
        assert_eq!(page.total_events, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.events[0].fields.name.as_deref(), Some("Open Mic"));
    }

    #[tokio::test]
    async fn blank_search_returns_nothing() {
        let service = service_with(&seeded());
        assert!(service.search("   ", 10).await.unwrap().is_empty());
        assert_eq!(service.search("jazz", 10).await.unwrap().len(), 2);
        assert_eq!(service.search("jazz", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sources_and_categories_are_distinct() {
        let service = service_with(&seeded());
        assert_eq!(service.sources().await.unwrap(), ["SeatGeek", "Ticketmaster"]);
        assert_eq!(service.categories().await.unwrap(), ["Comedy", "Music"]);
    }

    #[tokio::test]
    async fn clear_empties_both_tables() {
        let store = seeded();
        let service = service_with(&store);
        assert_eq!(service.stats().await.unwrap().events, 3);
        service.clear().await.unwrap();
        assert_eq!(service.stats().await.unwrap(), PipelineStats::default());
        assert!(service.get(1).await.unwrap().is_none());
    }
}
