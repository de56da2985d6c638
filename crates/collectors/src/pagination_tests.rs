#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::ApiClient;
    use crate::error::CollectorError;
    use crate::seatgeek::SeatGeekCollector;
    use crate::ticketmaster::TicketmasterCollector;
    use crate::Collector;

    const TM_PATH: &str = "/discovery/v2/events.json";
    const SG_PATH: &str = "/2/events";

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap().with_backoff(Duration::from_millis(1))
    }

    fn tm_page(number: u64, total_pages: u64, names: &[&str]) -> serde_json::Value {
        let events: Vec<_> = names
            .iter()
            .map(|n| json!({"name": n, "id": n, "url": format!("https://tm/{n}")}))
            .collect();
        json!({
            "_embedded": {"events": events},
            "page": {"number": number, "totalPages": total_pages}
        })
    }

    #[tokio::test]
    async fn ticketmaster_follows_pages_and_sends_market_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .and(query_param("apikey", "tm-key"))
            .and(query_param("dmaId", "343"))
            .and(query_param("sort", "date,asc"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tm_page(0, 2, &["a", "b"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tm_page(1, 2, &["c"])))
            .expect(1)
            .mount(&server)
            .await;

        let collector = TicketmasterCollector::new(client(&server), Some("tm-key")).unwrap();
        let items = collector.collect().await.unwrap();
        let urls: Vec<_> = items.iter().map(|i| i["url"].as_str().unwrap()).collect();
        assert_eq!(urls, ["https://tm/a", "https://tm/b", "https://tm/c"]);
    }

    #[tokio::test]
    async fn ticketmaster_stops_at_page_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(tm_page(0, 50, &["x"])))
            .expect(6)
            .mount(&server)
            .await;

        // Pages 0 through 5.
        let collector = TicketmasterCollector::new(client(&server), Some("tm-key")).unwrap();
        assert_eq!(collector.collect().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn ticketmaster_retries_transient_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(tm_page(0, 1, &["a"])))
            .expect(1)
            .mount(&server)
            .await;

        let collector = TicketmasterCollector::new(client(&server), Some("tm-key")).unwrap();
        assert_eq!(collector.collect().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn first_page_auth_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let collector = TicketmasterCollector::new(client(&server), Some("tm-key")).unwrap();
        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, CollectorError::HttpStatus { code: 401, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn later_page_failure_keeps_earlier_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(tm_page(0, 3, &["a", "b"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(TM_PATH))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let collector = TicketmasterCollector::new(client(&server), Some("tm-key")).unwrap();
        assert_eq!(collector.collect().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seatgeek_pages_from_meta_totals() {
        let server = MockServer::start().await;
        let event = |id: u64| {
            json!({"id": id, "title": format!("Show {id}"), "url": format!("https://sg/{id}"),
                   "datetime_utc": "2025-03-01T01:00:00"})
        };
        Mock::given(method("GET"))
            .and(path(SG_PATH))
            .and(query_param("client_id", "sg-id"))
            .and(query_param("venue.city", "Nashville"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [event(1), event(2)],
                "meta": {"total": 3, "per_page": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(SG_PATH))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [event(3)],
                "meta": {"total": 3, "per_page": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collector = SeatGeekCollector::new(client(&server), Some("sg-id")).unwrap();
        let items = collector.collect().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["event_id"], "3");
        assert_eq!(items[2]["source"], "seatgeek");
    }
}
