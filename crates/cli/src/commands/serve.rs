use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nashville_collectors::configured_collectors;
use nashville_core::Settings;
use nashville_http::{AppState, create_router, start_etl_pipeline};

use crate::open_storage;

pub(crate) async fn run(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.port = port;
    }
    if let Some(host) = host {
        settings.host = host;
    }

    let storage = open_storage(&settings).await?;
    let collectors = configured_collectors(&settings)?;
    let state = Arc::new(AppState::from_storage(&storage, collectors));

    match settings.etl_interval_secs.filter(|secs| *secs > 0) {
        Some(secs) => {
            tracing::info!(interval_secs = secs, "ETL loop enabled");
            start_etl_pipeline(Arc::clone(&state), Duration::from_secs(secs));
        },
        None => tracing::info!("etl_interval_secs not set, ETL loop disabled"),
    }

    let router = create_router(state);
    let addr = settings.bind_addr();
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
