//! Upstream current-weather API
//!
//! The service talks to the upstream through [`WeatherProvider`] so tests can
//! swap in a stub.

use crate::config::WeatherConfig;
use crate::error::AppError;
use crate::weather::models::WeatherReport;
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Message returned when the upstream does not know the city
pub const CITY_NOT_FOUND: &str = "City not found.";
/// Message returned for every other upstream failure
pub const UPSTREAM_FAILURE: &str = "Unable to fetch weather data from API.";

/// Source of current weather
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current weather for `city`
    async fn current(&self, city: &str) -> Result<WeatherReport, AppError>;
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    name: Option<String>,
    main: Option<UpstreamMain>,
    #[serde(default)]
    weather: Vec<UpstreamCondition>,
}

#[derive(Debug, Deserialize)]
struct UpstreamMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamCondition {
    description: String,
}

impl UpstreamResponse {
    fn into_report(self) -> Option<WeatherReport> {
        let condition = self.weather.into_iter().next()?.description;
        Some(WeatherReport {
            city: self.name.filter(|n| !n.is_empty())?,
            temperature: self.main?.temp,
            condition,
        })
    }
}

/// OpenWeatherMap client
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    /// Build a client with the configured timeout
    pub fn new(config: &WeatherConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal(anyhow!("Weather API key is not configured")))?;

        tracing::debug!(city = %city, "Fetching weather");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Weather request failed: {}", e);
                AppError::Upstream(UPSTREAM_FAILURE.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(CITY_NOT_FOUND.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            tracing::error!(status_code = status.as_u16(), error_body = %body, "Weather API returned error status");
            return Err(AppError::Upstream(UPSTREAM_FAILURE.to_string()));
        }

        let payload: UpstreamResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse weather response: {}", e);
            AppError::Upstream(UPSTREAM_FAILURE.to_string())
        })?;

        payload.into_report().ok_or_else(|| {
            tracing::error!(city = %city, "Incomplete data received from weather API");
            AppError::Upstream(UPSTREAM_FAILURE.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn client_for(url: String, api_key: Option<&str>) -> OpenWeatherClient {
        OpenWeatherClient::new(&WeatherConfig {
            api_key: api_key.map(str::to_string),
            base_url: url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_current_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "London".into()),
                Matcher::UrlEncoded("appid".into(), "test-key".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "name": "London",
                    "main": { "temp": 12.5, "humidity": 80 },
                    "weather": [{ "main": "Rain", "description": "light rain" }]
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(format!("{}/data/2.5/weather", server.url()), Some("test-key"));
        let report = client.current("London").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            report,
            WeatherReport {
                city: "London".into(),
                temperature: 12.5,
                condition: "light rain".into(),
            }
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_city() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"cod":"404","message":"city not found"}"#)
            .create_async()
            .await;

        let client = client_for(format!("{}/weather", server.url()), Some("k"));
        let err = client.current("Atlantis").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), CITY_NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn test_upstream_error_and_incomplete_payload() {
        let mut server = Server::new_async().await;
        let _unauthorized = server
            .mock("GET", "/weather")
            .match_query(Matcher::UrlEncoded("q".into(), "Paris".into()))
            .with_status(401)
            .with_body(r#"{"cod":401}"#)
            .create_async()
            .await;
        let _incomplete = server
            .mock("GET", "/weather")
            .match_query(Matcher::UrlEncoded("q".into(), "Oslo".into()))
            .with_status(200)
            .with_body(r#"{"name":"Oslo","weather":[]}"#)
            .create_async()
            .await;

        let client = client_for(format!("{}/weather", server.url()), Some("k"));
        for city in ["Paris", "Oslo"] {
            let err = client.current(city).await.unwrap_err();
            assert!(matches!(err, AppError::Upstream(_)));
            assert_eq!(err.public_message(), UPSTREAM_FAILURE);
        }
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = client_for("http://127.0.0.1:9".into(), None);
        assert!(matches!(
            client.current("London").await,
            Err(AppError::Internal(_))
        ));
    }
}
