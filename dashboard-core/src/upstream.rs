use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::warn;

use crate::{config::Config, error::truncate_body, model::ForecastPayload};

/// Source of live forecasts for the backend's city-query endpoint.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, city: &str) -> Result<ForecastPayload>;
}

/// OpenWeatherMap 5-day / 3-hour forecast API.
#[derive(Debug, Clone)]
pub struct OpenWeatherForecast {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherForecast {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, crate::config::DEFAULT_UPSTREAM_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.upstream_api_key()?;
        Ok(Self::with_base_url(api_key.to_owned(), config.upstream_url()))
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherForecast {
    async fn forecast(&self, city: &str) -> Result<ForecastPayload> {
        let url = format!("{}/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "en"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        // A non-200 body is still handed to the parser; error bodies fail there.
        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "OpenWeather returned non-success status");
        }

        let parsed: ForecastPayload =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        Ok(parsed)
    }
}
