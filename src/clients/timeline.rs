//! Timeline API Client
//!
//! Era and sub-era lookups. All filters are optional; absent or empty
//! filters are left out of the query string entirely.

use super::dto::Era;
use super::with_query;
use crate::api::{ApiResult, HttpClient, RequestOptions};
use serde_json::Value;

/// Typed facade over the timeline service
#[derive(Debug, Clone)]
pub struct TimelineClient {
    http: HttpClient,
}

/// Filters for `/timeline/eras`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraFilter {
    /// Publisher name, matched case-insensitively by the server
    pub publisher: Option<String>,
    /// Keep eras starting in or after this year
    pub start_year: Option<i32>,
    /// Keep eras ending in or before this year
    pub end_year: Option<i32>,
}

impl EraFilter {
    /// Endpoint path including the query string
    pub fn endpoint(&self) -> String {
        with_query(
            "/timeline/eras",
            &[
                ("publisher", self.publisher.clone()),
                ("start_year", self.start_year.map(|y| y.to_string())),
                ("end_year", self.end_year.map(|y| y.to_string())),
            ],
        )
    }
}

impl TimelineClient {
    /// Create a client on top of a request wrapper
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Eras, optionally filtered by publisher and year bounds
    pub async fn get_eras(
        &self,
        publisher: Option<&str>,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> ApiResult<Vec<Era>> {
        let filter = EraFilter {
            publisher: publisher.map(str::to_string),
            start_year,
            end_year,
        };
        self.get_eras_filtered(&filter).await
    }

    /// Eras matching a prepared filter
    pub async fn get_eras_filtered(&self, filter: &EraFilter) -> ApiResult<Vec<Era>> {
        self.http.request(&filter.endpoint(), RequestOptions::get()).await
    }

    /// Sub-eras of one era; records are returned untyped since their
    /// shape varies per publisher
    pub async fn get_suberas(
        &self,
        publisher: Option<&str>,
        era_name: Option<&str>,
    ) -> ApiResult<Vec<Value>> {
        let endpoint = with_query(
            "/timeline/suberas",
            &[
                ("publisher", publisher.map(str::to_string)),
                ("era_name", era_name.map(str::to_string)),
            ],
        );
        self.http.request(&endpoint, RequestOptions::get()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStore;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(server: &MockServer) -> TimelineClient {
        let session = SessionStore::restore(Arc::new(MemoryStore::new()));
        TimelineClient::new(HttpClient::new(server.uri(), session, None).unwrap())
    }

    fn crisis_era() -> serde_json::Value {
        json!({
            "id": 2,
            "title": "Post-Crisis Part 1",
            "ending_event": "Zero Hour",
            "years": [1985, 1994],
            "description": "Modern age following Crisis on Infinite Earths through Zero Hour"
        })
    }

    #[tokio::test]
    async fn test_get_eras_with_all_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/eras"))
            .and(query_param("publisher", "DC"))
            .and(query_param("start_year", "1985"))
            .and(query_param("end_year", "1986"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([crisis_era()])))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let eras = client.get_eras(Some("DC"), Some(1985), Some(1986)).await.unwrap();
        assert_eq!(eras.len(), 1);
        assert_eq!(eras[0].title, "Post-Crisis Part 1");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            requests[0].url.query(),
            Some("publisher=DC&start_year=1985&end_year=1986")
        );
    }

    #[tokio::test]
    async fn test_get_eras_without_filters_has_no_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/eras"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([crisis_era()])))
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        client.get_eras(None, None, None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.path(), "/timeline/eras");
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_get_eras_not_found_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/eras"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                json!({"detail": "No eras found matching the criteria"}),
            ))
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let err = client.get_eras(Some("Image"), None, None).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_get_suberas() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/timeline/suberas"))
            .and(query_param("publisher", "DC"))
            .and(query_param("era_name", "Pre-Crisis"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"title": "Golden Age"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = create_test_client(&server);
        let suberas = client
            .get_suberas(Some("DC"), Some("Pre-Crisis"))
            .await
            .unwrap();
        assert_eq!(suberas[0]["title"], "Golden Age");
    }

    #[test]
    fn test_endpoint_skips_empty_publisher() {
        let filter = EraFilter {
            publisher: Some(String::new()),
            start_year: None,
            end_year: Some(2009),
        };
        assert_eq!(filter.endpoint(), "/timeline/eras?end_year=2009");
    }

    #[test]
    fn test_endpoint_encodes_values() {
        let filter = EraFilter {
            publisher: Some("Dark Horse".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.endpoint(), "/timeline/eras?publisher=Dark%20Horse");
    }
}
