//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/weather", get(handlers::city_weather))
        .route("/data", get(handlers::latest_data))
        .with_state(state)
}
