mod fts;
mod listing;
pub(crate) mod utils;

use async_trait::async_trait;
use nashville_core::{Event, EventFilter, EventPage};

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::SearchStore;

#[async_trait]
impl SearchStore for PgStorage {
    async fn list_events(&self, filter: &EventFilter) -> Result<EventPage, StorageError> {
        listing::list_events(self, filter).await
    }

    async fn search_events(&self, query: &str, limit: usize) -> Result<Vec<Event>, StorageError> {
        fts::search(self, query, limit).await
    }

    async fn list_sources(&self) -> Result<Vec<String>, StorageError> {
        listing::distinct_values(self, "source").await
    }

    async fn list_categories(&self) -> Result<Vec<String>, StorageError> {
        listing::distinct_values(self, "category").await
    }
}
