//! Request handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use dashboard_core::{DEFAULT_CITY, ForecastPayload, SnapshotResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

impl CityQuery {
    fn city(&self) -> &str {
        match self.city.as_deref() {
            Some(city) if !city.is_empty() => city,
            _ => DEFAULT_CITY,
        }
    }
}

/// Live lookup for a city. The result also becomes the latest snapshot.
pub async fn city_weather(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<ForecastPayload>, (StatusCode, String)> {
    let city = query.city();

    let payload = state.provider.forecast(city).await.map_err(|e| {
        error!(%city, error = %e, "Forecast lookup failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
    })?;

    if let Some(current) = payload.list.first() {
        info!(
            city = %payload.city.name,
            temp_c = current.main.temp,
            humidity_pct = current.main.humidity,
            description = current.weather.first().map(|w| w.description.as_str()).unwrap_or(""),
            time = current.dt_txt.as_deref().unwrap_or(""),
            "Current forecast"
        );
    }

    state.publisher.publish(&payload).await;
    info!(city = %payload.city.name, "Published forecast");

    Ok(Json(payload))
}

/// Latest published forecast, or the "no data" marker.
pub async fn latest_data(State(state): State<AppState>) -> Json<SnapshotResponse> {
    Json(state.snapshots.latest().await)
}
