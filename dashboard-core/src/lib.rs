//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - The weather payload schema and the display-ready reading
//! - The view surface a dashboard renders into
//! - The dashboard controller and its HTTP weather source
//! - Configuration and the upstream forecast provider used by the backend
//!
//! It is used by `dashboard-cli` and `dashboard-server`.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod source;
pub mod upstream;
pub mod view;

pub use config::{Config, DEFAULT_CITY, MqttConfig, UpstreamConfig};
pub use dashboard::{Dashboard, SnapshotOutcome, format_reading};
pub use error::{DashboardError, FETCH_FAILED_MESSAGE};
pub use model::{ForecastPayload, SnapshotResponse, WeatherReading, WindOrigin};
pub use source::{HttpWeatherSource, WeatherSource};
pub use upstream::{ForecastProvider, OpenWeatherForecast};
pub use view::{DashboardView, Field, MemoryView};
