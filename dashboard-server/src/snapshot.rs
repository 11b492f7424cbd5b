//! Holds the most recently published forecast.

use async_trait::async_trait;
use dashboard_core::{ForecastPayload, SnapshotResponse};
use tokio::sync::RwLock;

/// Where successful city lookups are published.
#[async_trait]
pub trait SnapshotPublisher: Send + Sync {
    async fn publish(&self, payload: &ForecastPayload);
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: RwLock<Option<ForecastPayload>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest payload; last writer wins.
    pub async fn replace(&self, payload: ForecastPayload) {
        *self.latest.write().await = Some(payload);
    }

    pub async fn latest(&self) -> SnapshotResponse {
        match self.latest.read().await.as_ref() {
            Some(payload) => SnapshotResponse::Payload(payload.clone()),
            None => SnapshotResponse::no_data(),
        }
    }
}

/// Without a broker, publishing goes straight into the store.
#[async_trait]
impl SnapshotPublisher for SnapshotStore {
    async fn publish(&self, payload: &ForecastPayload) {
        self.replace(payload.clone()).await;
    }
}
