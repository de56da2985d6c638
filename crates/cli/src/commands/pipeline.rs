use std::path::PathBuf;

use anyhow::{Result, bail};
use nashville_collectors::{JsonFileCollector, collector_for, configured_collectors};
use nashville_core::Settings;
use nashville_service::{EventService, IngestService, NormalizeService};

use crate::{open_storage, print_json};

pub(crate) async fn run_collect(settings: &Settings, sources: &[String]) -> Result<()> {
    let collectors = if sources.is_empty() {
        configured_collectors(settings)?
    } else {
        sources.iter().map(|label| collector_for(label, settings)).collect::<Result<Vec<_>, _>>()?
    };
    if collectors.is_empty() {
        bail!("no collectors configured (set TICKETMASTER_API_KEY or SEATGEEK_CLIENT_ID)");
    }

    let storage = open_storage(settings).await?;
    let ingest = IngestService::new(storage);
    let mut failures = 0_usize;
    for collector in &collectors {
        match ingest.run_collector(collector.as_ref()).await {
            Ok(count) => println!("{}: {count} captures staged", collector.label()),
            Err(e) => {
                failures = failures.saturating_add(1);
                tracing::error!(source_spider = %collector.label(), error = %e, "collector failed");
            },
        }
    }
    if failures == collectors.len() {
        bail!("every collector failed");
    }
    Ok(())
}

pub(crate) async fn run_ingest(settings: &Settings, spider: &str, file: PathBuf) -> Result<()> {
    let collector = JsonFileCollector::new(spider.trim(), file);
    let storage = open_storage(settings).await?;
    let count = IngestService::new(storage).run_collector(&collector).await?;
    println!("{count} captures staged from {}", collector.path().display());
    Ok(())
}

pub(crate) async fn run_normalize(settings: &Settings, after_id: i64) -> Result<()> {
    let storage = open_storage(settings).await?;
    let report = NormalizeService::new(storage.clone(), storage).run(after_id).await?;
    print_json(&report)
}

pub(crate) async fn run_clear(settings: &Settings, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete all events and raw captures without --yes");
    }
    let storage = open_storage(settings).await?;
    EventService::new(storage.clone(), storage.clone(), storage).clear().await?;
    println!("events and raw_data cleared");
    Ok(())
}
