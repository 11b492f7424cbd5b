//! The dashboard controller: fetches readings and writes them into a view.
//!
//! Every trigger is an independent request. Nothing tracks requests in
//! flight, so when two overlap the one that completes last owns the view.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{
    config::DEFAULT_CITY,
    error::DashboardError,
    model::{SnapshotResponse, WeatherReading, WindOrigin},
    source::WeatherSource,
    view::{DashboardView, Field},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Rendered,
    NoData,
    Failed,
}

#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn WeatherSource>,
    view: Arc<dyn DashboardView>,
    default_city: String,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("source", &self.source)
            .field("default_city", &self.default_city)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(source: Arc<dyn WeatherSource>, view: Arc<dyn DashboardView>) -> Self {
        Self {
            source,
            view,
            default_city: DEFAULT_CITY.to_string(),
        }
    }

    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Render the latest snapshot if there is one. Failures are logged, never shown.
    pub async fn load_cached_reading(&self) -> SnapshotOutcome {
        let snapshot = match self.source.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(error = %err, "Error fetching snapshot data");
                return SnapshotOutcome::Failed;
            }
        };

        match snapshot {
            SnapshotResponse::NoData { message } => {
                info!(%message, "No snapshot data yet");
                SnapshotOutcome::NoData
            }
            SnapshotResponse::Payload(payload) => match WeatherReading::from_payload(&payload) {
                Ok(reading) => {
                    self.render(&reading);
                    SnapshotOutcome::Rendered
                }
                Err(err) => {
                    error!(error = %err, "Snapshot payload could not be rendered");
                    SnapshotOutcome::Failed
                }
            },
        }
    }

    /// Look up `city` and render it. Any failure raises the fixed user notification once.
    pub async fn load_reading_for_city(&self, city: &str) -> Result<(), DashboardError> {
        let result = match self.source.forecast_for(city).await {
            Ok(payload) => WeatherReading::from_payload(&payload),
            Err(err) => Err(err),
        };

        match result {
            Ok(reading) => {
                self.render(&reading);
                Ok(())
            }
            Err(err) => {
                debug!(%city, error = %err, "City lookup failed");
                self.view.alert(err.user_message());
                Err(err)
            }
        }
    }

    /// Overwrite the five display regions with `reading`.
    pub fn render(&self, reading: &WeatherReading) {
        if reading.wind_origin == WindOrigin::Placeholder {
            debug!(city = %reading.city_name, "payload has no wind data, showing placeholder");
        }
        for (field, text) in format_reading(reading) {
            self.view.set_text(field, &text);
        }
    }

    /// Start-up trigger: always a city lookup for the default city.
    pub async fn on_page_load(&self) -> Result<(), DashboardError> {
        let city = self.default_city.clone();
        self.load_reading_for_city(&city).await
    }

    /// Search trigger: reads the input, falling back to the default city when blank.
    pub async fn on_search(&self) -> Result<(), DashboardError> {
        let city = self.search_city();
        self.load_reading_for_city(&city).await
    }

    /// Fire-and-forget variant of [`Dashboard::on_search`].
    pub fn spawn_search(&self) -> JoinHandle<()> {
        let dashboard = self.clone();
        let city = self.search_city();
        tokio::spawn(async move {
            let _ = dashboard.load_reading_for_city(&city).await;
        })
    }

    /// Only an empty input falls back; anything else is sent as typed.
    fn search_city(&self) -> String {
        let input = self.view.input_value();
        if input.is_empty() {
            self.default_city.clone()
        } else {
            input
        }
    }
}

/// Display strings for each region.
pub fn format_reading(reading: &WeatherReading) -> [(Field, String); 5] {
    [
        (Field::City, format!("📍 {}", reading.city_name)),
        (Field::Temperature, format!("{:.1}°C", round_tenths(reading.temperature_celsius))),
        (Field::Description, reading.description.clone()),
        (Field::Humidity, format!("{}%", reading.humidity_percent)),
        (Field::Wind, format!("{:.1} km/h", round_tenths(reading.wind_speed_kmh))),
    ]
}

/// Round to one decimal with ties away from zero; `{:.1}` alone rounds ties to even.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
