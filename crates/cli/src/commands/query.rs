use anyhow::Result;
use nashville_core::Settings;
use nashville_service::EventService;

use crate::{open_storage, print_json};

async fn event_service(settings: &Settings) -> Result<EventService> {
    let storage = open_storage(settings).await?;
    Ok(EventService::new(storage.clone(), storage.clone(), storage))
}

pub(crate) async fn run_search(settings: &Settings, query: &str, limit: usize) -> Result<()> {
    let events = event_service(settings).await?.search(query, limit).await?;
    print_json(&events)
}

pub(crate) async fn run_sources(settings: &Settings) -> Result<()> {
    print_json(&event_service(settings).await?.sources().await?)
}

pub(crate) async fn run_stats(settings: &Settings) -> Result<()> {
    print_json(&event_service(settings).await?.stats().await?)
}
