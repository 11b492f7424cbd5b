//! Backend for the weather dashboard.
//!
//! Serves the two endpoints the dashboard reads from:
//! - `GET /api/weather?city=` proxies a live forecast lookup and publishes the
//!   result as the latest snapshot
//! - `GET /data` returns the latest snapshot, or a "no data" marker
//!
//! With an `[mqtt]` section configured, publishing goes through the broker
//! and the snapshot is filled from the topic subscription.

pub mod handlers;
pub mod relay;
pub mod routes;
pub mod snapshot;
pub mod state;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use dashboard_core::{Config, OpenWeatherForecast};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use relay::MqttRelay;
pub use routes::create_router;
pub use snapshot::{SnapshotPublisher, SnapshotStore};
pub use state::AppState;

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(config: &Config, addr: &str) -> anyhow::Result<()> {
    let provider = OpenWeatherForecast::from_config(config)?;

    let snapshots = Arc::new(SnapshotStore::new());
    let publisher: Arc<dyn SnapshotPublisher> = match &config.mqtt {
        Some(mqtt) => Arc::new(MqttRelay::start(mqtt, snapshots.clone())?),
        None => snapshots.clone(),
    };

    let state = AppState::with_publisher(Arc::new(provider), publisher, snapshots);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("{}", banner(listener.local_addr()?));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Startup line printed regardless of the log filter.
pub fn banner(addr: SocketAddr) -> String {
    format!("🌍 Web server running at: http://{addr}")
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
