//! Ticketmaster Discovery API collector.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::CollectorError;
use crate::{Collector, join_present, str_at};

pub const TICKETMASTER_LABEL: &str = "ticketmaster";

const EVENTS_PATH: &str = "/discovery/v2/events.json";
/// Nashville designated market area.
const NASHVILLE_DMA_ID: &str = "343";
const PAGE_SIZE: u32 = 200;
/// Pages are 0-based; the last one fetched is page 5.
const LAST_PAGE: u64 = 5;

pub struct TicketmasterCollector {
    client: ApiClient,
    api_key: String,
}

impl std::fmt::Debug for TicketmasterCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketmasterCollector")
            .field("client", &self.client)
            .field("api_key", &"***")
            .finish()
    }
}

impl TicketmasterCollector {
    /// # Errors
    /// `MissingCredential` when `api_key` is absent or blank.
    pub fn new(client: ApiClient, api_key: Option<&str>) -> Result<Self, CollectorError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CollectorError::MissingCredential("ticketmaster_api_key"))?;
        Ok(Self { client, api_key: api_key.to_owned() })
    }

    fn query(&self, page: u64) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.clone()),
            ("dmaId", NASHVILLE_DMA_ID.to_owned()),
            ("stateCode", "TN".to_owned()),
            ("city", "Nashville".to_owned()),
            ("size", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
            ("sort", "date,asc".to_owned()),
        ]
    }
}

#[async_trait]
impl Collector for TicketmasterCollector {
    fn label(&self) -> &str {
        TICKETMASTER_LABEL
    }

    async fn collect(&self) -> Result<Vec<Value>, CollectorError> {
        let mut items = Vec::new();
        let mut page: u64 = 0;
        loop {
            let body = match self.client.get_json(EVENTS_PATH, &self.query(page)).await {
                Ok(body) => body,
                Err(e) if page == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!(page, error = %e, "ticketmaster page failed, keeping earlier pages");
                    break;
                },
            };
            let Some(events) = body.pointer("/_embedded/events").and_then(Value::as_array) else {
                tracing::warn!(page, "no events in ticketmaster response");
                break;
            };
            tracing::info!(page, count = events.len(), "ticketmaster events fetched");
            items.extend(events.iter().map(event_item));

            let total_pages = body.pointer("/page/totalPages").and_then(Value::as_u64).unwrap_or(0);
            page += 1;
            if page >= total_pages || page > LAST_PAGE {
                break;
            }
        }
        Ok(items)
    }
}

/// Flatten one Discovery API event into the capture shape stored in `raw_data`.
fn event_item(event: &Value) -> Value {
    let venue = event.pointer("/_embedded/venues/0");
    let venue_field = |pointer: &str| venue.and_then(|v| str_at(v, pointer));
    let venue_address = venue.map(|_| {
        join_present(&[
            venue_field("/address/line1"),
            venue_field("/city/name"),
            venue_field("/state/stateCode"),
            venue_field("/postalCode"),
        ])
    });
    json!({
        "name": str_at(event, "/name"),
        "event_id": str_at(event, "/id"),
        "url": str_at(event, "/url"),
        "description": str_at(event, "/info").or_else(|| str_at(event, "/pleaseNote")),
        "source": TICKETMASTER_LABEL,
        "event_date": str_at(event, "/dates/start/dateTime")
            .or_else(|| str_at(event, "/dates/start/localDate")),
        "venue_name": venue_field("/name"),
        "venue_city": venue_field("/city/name"),
        "venue_address": venue_address,
    })
}
