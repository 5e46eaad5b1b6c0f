//! Stats API Client
//!
//! HTTP client for the three read-only endpoints the dashboard consumes.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use super::CheckinSource;
use crate::model::{first_out_of_order, GeoCheckin, SummaryStats, WeeklyBucket};

/// Path of the summary statistics endpoint
pub const STATS_PATH: &str = "/api/stats";
/// Path of the weekly timeline endpoint
pub const WEEKLY_TIMELINE_PATH: &str = "/api/timeline/weekly";
/// Path of the geo check-in list endpoint
pub const GEO_CHECKINS_PATH: &str = "/api/checkins/geo";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the stats API (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// REST client for the stats API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a path and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Fetching");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CheckinSource for ApiClient {
    async fn fetch_stats(&self) -> FetchResult<SummaryStats> {
        let stats: SummaryStats = self.get_json(STATS_PATH).await?;
        stats.validate()?;
        Ok(stats)
    }

    async fn fetch_weekly_timeline(&self) -> FetchResult<Vec<WeeklyBucket>> {
        self.get_json(WEEKLY_TIMELINE_PATH).await
    }

    async fn fetch_geo_checkins(&self) -> FetchResult<Vec<GeoCheckin>> {
        let checkins: Vec<GeoCheckin> = self.get_json(GEO_CHECKINS_PATH).await?;
        for checkin in &checkins {
            checkin.validate()?;
        }

        if let Some(i) = first_out_of_order(&checkins) {
            tracing::warn!(
                index = i,
                id = %checkins[i].id,
                "Geo check-ins are not in chronological order; playback keeps API order"
            );
        }

        Ok(checkins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ApiClientConfig {
            base_url: server.url(),
            request_timeout_ms: 5_000,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ApiClient::new(ApiClientConfig {
            base_url: "http://example.test/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://example.test");
        assert_eq!(client.url(STATS_PATH), "http://example.test/api/stats");
    }

    #[tokio::test]
    async fn fetch_stats_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/stats")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total_checkins":5120,"unique_venues":1830,"top_city":"Lisbon","total_distance_km":0.0}"#)
            .create_async()
            .await;

        let stats = client_for(&server).fetch_stats().await.unwrap();
        assert_eq!(stats.total_checkins, 5120);
        assert_eq!(stats.unique_venues, 1830);
        assert_eq!(stats.top_city, "Lisbon");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_weekly_timeline_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/timeline/weekly")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"week":"2015-01-04","count":3},{"week":"2015-01-11","count":0},{"week":"2015-01-18","count":9}]"#)
            .create_async()
            .await;

        let weeks = client_for(&server).fetch_weekly_timeline().await.unwrap();
        let labels: Vec<&str> = weeks.iter().map(|w| w.week.as_str()).collect();
        assert_eq!(labels, vec!["2015-01-04", "2015-01-11", "2015-01-18"]);
        assert_eq!(weeks[2].count, 9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_geo_checkins_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/checkins/geo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":"a","venue_name":"Cafe","lat":38.7,"lng":-9.1,"timestamp":1420070400,"shout":"first!"},
                    {"id":"b","venue_name":null,"lat":40.4,"lng":-3.7,"timestamp":1420156800,"shout":null}
                ]"#,
            )
            .create_async()
            .await;

        let checkins = client_for(&server).fetch_geo_checkins().await.unwrap();
        assert_eq!(checkins.len(), 2);
        assert_eq!(checkins[0].shout.as_deref(), Some("first!"));
        assert_eq!(checkins[1].venue_name, "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_geo_checkins_rejects_bad_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/checkins/geo")
            .with_status(200)
            .with_body(r#"[{"id":"a","venue_name":"Nowhere","lat":123.0,"lng":0.0,"timestamp":0,"shout":null}]"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_geo_checkins().await;
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn fetch_stats_schema_mismatch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/stats")
            .with_status(200)
            .with_body(r#"{"message":"API is running. Frontend build not found."}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_stats().await;
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn fetch_stats_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/stats")
            .with_status(404)
            .with_body("Database not found")
            .create_async()
            .await;

        let result = client_for(&server).fetch_stats().await;
        assert_eq!(
            result,
            Err(FetchError::Status {
                status: 404,
                message: "Database not found".to_string()
            })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_unreachable_is_network_error() {
        // Reserve a free port, then release it so connections are refused
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ApiClient::new(ApiClientConfig {
            base_url: format!("http://127.0.0.1:{}", port),
            request_timeout_ms: 2_000,
        })
        .unwrap();

        let err = client.fetch_weekly_timeline().await.unwrap_err();
        assert!(err.is_network());
    }
}
