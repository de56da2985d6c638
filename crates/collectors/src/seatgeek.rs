//! SeatGeek platform API collector.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::CollectorError;
use crate::{Collector, join_present, str_at};

pub const SEATGEEK_LABEL: &str = "seatgeek";

const EVENTS_PATH: &str = "/2/events";
const PER_PAGE: u64 = 100;
const MAX_PAGES: u64 = 10;

pub struct SeatGeekCollector {
    client: ApiClient,
    client_id: String,
}

impl std::fmt::Debug for SeatGeekCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatGeekCollector")
            .field("client", &self.client)
            .field("client_id", &"***")
            .finish()
    }
}

impl SeatGeekCollector {
    /// # Errors
    /// `MissingCredential` when `client_id` is absent or blank.
    pub fn new(client: ApiClient, client_id: Option<&str>) -> Result<Self, CollectorError> {
        let client_id = client_id
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CollectorError::MissingCredential("seatgeek_client_id"))?;
        Ok(Self { client, client_id: client_id.to_owned() })
    }

    fn query(&self, page: u64) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.clone()),
            ("venue.city", "Nashville".to_owned()),
            ("venue.state", "TN".to_owned()),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ]
    }
}

#[async_trait]
impl Collector for SeatGeekCollector {
    fn label(&self) -> &str {
        SEATGEEK_LABEL
    }

    async fn collect(&self) -> Result<Vec<Value>, CollectorError> {
        let mut items = Vec::new();
        // SeatGeek pages are 1-based.
        let mut page: u64 = 1;
        loop {
            let body = match self.client.get_json(EVENTS_PATH, &self.query(page)).await {
                Ok(body) => body,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(page, error = %e, "seatgeek page failed, keeping earlier pages");
                    break;
                },
            };
            let Some(events) = body.get("events").and_then(Value::as_array) else {
                tracing::warn!(page, "no events in seatgeek response");
                break;
            };
            tracing::info!(page, count = events.len(), "seatgeek events fetched");
            items.extend(events.iter().map(event_item));

            let total = body.pointer("/meta/total").and_then(Value::as_u64).unwrap_or(0);
            let per_page = body
                .pointer("/meta/per_page")
                .and_then(Value::as_u64)
                .filter(|n| *n > 0)
                .unwrap_or(PER_PAGE);
            if page >= total.div_ceil(per_page) || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

fn event_item(event: &Value) -> Value {
    let venue = event.get("venue").filter(|v| v.is_object());
    let venue_field = |key: &str| venue.and_then(|v| str_at(v, key));
    let venue_address = venue.map(|_| {
        join_present(&[
            venue_field("/address"),
            venue_field("/extended_address"),
            venue_field("/city"),
            venue_field("/state"),
            venue_field("/postal_code"),
        ])
    });
    json!({
        "name": str_at(event, "/title").or_else(|| str_at(event, "/short_title")),
        "event_id": str_at(event, "/id"),
        "url": str_at(event, "/url"),
        "source": SEATGEEK_LABEL,
        "description": str_at(event, "/description"),
        "event_date": str_at(event, "/datetime_utc").or_else(|| str_at(event, "/datetime_local")),
        "venue_name": venue_field("/name"),
        "venue_city": venue_field("/city"),
        "venue_address": venue_address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_becomes_string() {
        let item = event_item(&json!({
            "id": 6_123_456,
            "short_title": "Preds vs Stars",
            "url": "https://sg/e/1",
            "datetime_local": "2025-03-01T19:00:00",
            "venue": {"name": "Bridgestone Arena", "address": "501 Broadway", "city": "Nashville",
                      "state": "TN", "postal_code": "37203", "extended_address": null}
        }));
        assert_eq!(item["event_id"], "6123456");
        assert_eq!(item["name"], "Preds vs Stars");
        assert_eq!(item["event_date"], "2025-03-01T19:00:00");
        assert_eq!(item["venue_address"], "501 Broadway, Nashville, TN, 37203");
    }
}
