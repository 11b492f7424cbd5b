use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Weather payload as served by the city-query and snapshot endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub city: CityInfo,
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_txt: Option<String>,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
}

/// Wind block; `speed` is in m/s when the upstream is queried with metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Body of `GET /data`: either the "no data yet" marker or a full payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotResponse {
    NoData { message: String },
    Payload(ForecastPayload),
}

impl SnapshotResponse {
    pub const NO_DATA_MESSAGE: &'static str = "No data received yet";

    pub fn no_data() -> Self {
        Self::NoData {
            message: Self::NO_DATA_MESSAGE.to_string(),
        }
    }
}

/// Where the displayed wind speed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindOrigin {
    /// Converted from the payload's `wind.speed`.
    Payload,
    /// Random stand-in; the payload carried no wind data.
    Placeholder,
}

/// One reading ready for display. Built fresh per response and discarded after rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city_name: String,
    pub temperature_celsius: f64,
    pub description: String,
    pub humidity_percent: u8,
    pub wind_speed_kmh: f64,
    pub wind_origin: WindOrigin,
}

impl WeatherReading {
    /// Build a reading from the first forecast entry and its first condition.
    pub fn from_payload(payload: &ForecastPayload) -> Result<Self, DashboardError> {
        let entry = payload.list.first().ok_or(DashboardError::EmptyForecast)?;
        let condition = entry.weather.first().ok_or(DashboardError::MissingCondition)?;

        let (wind_speed_kmh, wind_origin) = match &entry.wind {
            Some(wind) => (wind.speed * 3.6, WindOrigin::Payload),
            None => (placeholder_wind_kmh(), WindOrigin::Placeholder),
        };

        Ok(Self {
            city_name: payload.city.name.clone(),
            temperature_celsius: entry.main.temp,
            description: condition.description.clone(),
            humidity_percent: entry.main.humidity,
            wind_speed_kmh,
            wind_origin,
        })
    }
}

/// Random wind speed in [2, 12) km/h.
fn placeholder_wind_kmh() -> f64 {
    rand::rng().random_range(2.0..12.0)
}
