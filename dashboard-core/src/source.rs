use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::Config,
    error::{DashboardError, truncate_body},
    model::{ForecastPayload, SnapshotResponse},
};

/// Path of the snapshot endpoint.
pub const SNAPSHOT_PATH: &str = "/data";

/// Path of the city-query endpoint.
pub const CITY_QUERY_PATH: &str = "/api/weather";

/// Where the dashboard gets its weather data from.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Latest published payload, or the "no data" marker.
    async fn snapshot(&self) -> Result<SnapshotResponse, DashboardError>;

    /// Live lookup for `city`.
    async fn forecast_for(&self, city: &str) -> Result<ForecastPayload, DashboardError>;
}

/// Talks to the dashboard backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWeatherSource {
    base_url: String,
    http: Client,
}

impl HttpWeatherSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            http: Client::new(),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DashboardError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: trim_base(base_url.into()),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        match config.request_timeout() {
            Some(timeout) => Self::with_timeout(config.server_url(), timeout),
            None => Ok(Self::new(config.server_url())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, DashboardError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "sending dashboard request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| DashboardError::Request {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| DashboardError::Request {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(DashboardError::Status {
                url,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn snapshot(&self) -> Result<SnapshotResponse, DashboardError> {
        let body = self.get_text(SNAPSHOT_PATH, &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn forecast_for(&self, city: &str) -> Result<ForecastPayload, DashboardError> {
        let body = self.get_text(CITY_QUERY_PATH, &[("city", city)]).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
