//! Application state shared across handlers

use std::sync::Arc;

use dashboard_core::ForecastProvider;

use crate::snapshot::{SnapshotPublisher, SnapshotStore};

#[derive(Clone)]
pub struct AppState {
    /// Upstream used for city lookups
    pub provider: Arc<dyn ForecastProvider>,
    /// Receives every successful lookup
    pub publisher: Arc<dyn SnapshotPublisher>,
    /// Latest snapshot served by `/data`
    pub snapshots: Arc<SnapshotStore>,
}

impl AppState {
    /// State that publishes straight into its own snapshot store.
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        let snapshots = Arc::new(SnapshotStore::new());
        Self {
            provider,
            publisher: snapshots.clone(),
            snapshots,
        }
    }

    pub fn with_publisher(
        provider: Arc<dyn ForecastProvider>,
        publisher: Arc<dyn SnapshotPublisher>,
        snapshots: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            provider,
            publisher,
            snapshots,
        }
    }
}
