//! MQTT relay for published forecasts.
//!
//! Lookups are published to the configured topic; the snapshot store is filled
//! from the subscription to that same topic, so `/data` reflects what the
//! broker delivered.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use dashboard_core::{ForecastPayload, MqttConfig};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tracing::{debug, error, info, warn};

use crate::snapshot::{SnapshotPublisher, SnapshotStore};

const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Pause before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const REQUEST_CAPACITY: usize = 10;

pub struct MqttRelay {
    client: AsyncClient,
    topic: String,
}

impl MqttRelay {
    /// Connect to the broker and start feeding `store` from the topic.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: &MqttConfig, store: Arc<SnapshotStore>) -> anyhow::Result<Self> {
        let (host, port) = config.broker_addr()?;
        let topic = config.topic().to_string();

        let mut options = MqttOptions::new(config.client_id(), host.clone(), port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        tokio::spawn(run_event_loop(
            eventloop,
            client.clone(),
            topic.clone(),
            store,
        ));

        info!(%host, port, %topic, "MQTT relay started");
        Ok(Self { client, topic })
    }
}

#[async_trait]
impl SnapshotPublisher for MqttRelay {
    async fn publish(&self, payload: &ForecastPayload) {
        let bytes = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Failed to serialize forecast for MQTT");
                return;
            }
        };

        if let Err(e) = self
            .client
            .publish(self.topic.as_str(), QoS::AtMostOnce, false, bytes)
            .await
        {
            warn!(error = %e, topic = %self.topic, "Failed to publish forecast");
        }
    }
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    topic: String,
    store: Arc<SnapshotStore>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to MQTT broker");
                // try_subscribe: awaiting here would stall the loop that drains the request queue
                if let Err(e) = client.try_subscribe(topic.as_str(), QoS::AtMostOnce) {
                    error!(error = %e, %topic, "Subscription error");
                }
            }
            Ok(Event::Incoming(Packet::Publish(msg))) if msg.topic == topic => {
                debug!(%topic, bytes = msg.payload.len(), "Received MQTT message");
                receive(&store, &msg.payload).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "MQTT connection error");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Store a message from the topic as the latest snapshot. Returns false if it is not a forecast.
pub(crate) async fn receive(store: &SnapshotStore, payload: &[u8]) -> bool {
    match serde_json::from_slice::<ForecastPayload>(payload) {
        Ok(forecast) => {
            store.replace(forecast).await;
            true
        }
        Err(e) => {
            warn!(error = %e, "Ignoring MQTT message that is not a forecast payload");
            false
        }
    }
}
