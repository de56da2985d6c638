//! Collectors for the nashville pipeline
//!
//! A collector produces raw event captures under a stable label; the ingest
//! service writes each capture to `raw_data` unchanged.

mod client;
mod error;
mod json_file;
mod seatgeek;
mod ticketmaster;

#[cfg(test)]
mod pagination_tests;

use async_trait::async_trait;
use nashville_core::Settings;
use serde_json::Value;

pub use client::ApiClient;
pub use error::CollectorError;
pub use json_file::JsonFileCollector;
pub use seatgeek::{SEATGEEK_LABEL, SeatGeekCollector};
pub use ticketmaster::{TICKETMASTER_LABEL, TicketmasterCollector};

/// A source of raw captures.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Stable label written to `raw_data.source_spider`.
    fn label(&self) -> &str;

    /// Gather every capture available right now.
    async fn collect(&self) -> Result<Vec<Value>, CollectorError>;
}

/// API collectors whose credentials are present in `settings`.
///
/// Collectors without credentials are skipped with an info log.
///
/// # Errors
/// Returns an error if an HTTP client cannot be built.
pub fn configured_collectors(settings: &Settings) -> Result<Vec<Box<dyn Collector>>, CollectorError> {
    let mut collectors: Vec<Box<dyn Collector>> = Vec::new();

    let client = ApiClient::new(&settings.ticketmaster_base_url, settings.http_timeout())?;
    match TicketmasterCollector::new(client, settings.ticketmaster_api_key.as_deref()) {
        Ok(c) => collectors.push(Box::new(c)),
        Err(e) => tracing::info!(error = %e, "ticketmaster collector disabled"),
    }

    let client = ApiClient::new(&settings.seatgeek_base_url, settings.http_timeout())?;
    match SeatGeekCollector::new(client, settings.seatgeek_client_id.as_deref()) {
        Ok(c) => collectors.push(Box::new(c)),
        Err(e) => tracing::info!(error = %e, "seatgeek collector disabled"),
    }

    Ok(collectors)
}

/// Collector by label, for the named API sources.
///
/// # Errors
/// `MissingCredential` if the source is known but not configured;
/// `UnknownSource` if the label is not an API collector.
pub fn collector_for(label: &str, settings: &Settings) -> Result<Box<dyn Collector>, CollectorError> {
    match label {
        TICKETMASTER_LABEL => {
            let client = ApiClient::new(&settings.ticketmaster_base_url, settings.http_timeout())?;
            Ok(Box::new(TicketmasterCollector::new(client, settings.ticketmaster_api_key.as_deref())?))
        },
        SEATGEEK_LABEL => {
            let client = ApiClient::new(&settings.seatgeek_base_url, settings.http_timeout())?;
            Ok(Box::new(SeatGeekCollector::new(client, settings.seatgeek_client_id.as_deref())?))
        },
        other => Err(CollectorError::UnknownSource(other.to_owned())),
    }
}

/// String at a JSON pointer. Numbers are rendered; blank strings are `None`.
pub(crate) fn str_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Join the present parts with ", ".
pub(crate) fn join_present(parts: &[Option<String>]) -> String {
    parts.iter().flatten().map(String::as_str).collect::<Vec<_>>().join(", ")
}
