// [libs/infra/bus/src/lib.rs]
/*!
 * APARATO: FAN-OUT BUS
 * RESPONSABILIDAD: Difusión de notificaciones de eventos a suscriptores de streaming,
 * saltando el límite de proceso entre la API y el worker.
 */

use async_trait::async_trait;
use attention_domain_models::FanOutMessage;
use attention_domain_pipeline::{CapabilityError, FanOutPublisher};
use futures::stream::{Stream, StreamExt};
use redis::AsyncCommands;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, instrument, warn};

/// Capacity of the process-local fan-out channel: it is explicit that the
/// bus is best-effort -- a subscriber that falls this far behind the
/// publication rate starts silently missing messages rather than applying
/// backpressure to publishers.
const CHANNEL_CAPACITY: usize = 1024;

/// Fixed Redis pub/sub channel name carrying JSON-encoded [`FanOutMessage`]s
/// ("bus channel: fixed name, single topic, JSON-encoded payloads").
const CHANNEL_NAME: &str = "attention_map:events";

/// Delay before a dropped Redis subscription connection is retried.
const RESUBSCRIBE_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum BusError {
    #[error("failed to connect to bus backend: {0}")]
    Connect(String),

    #[error("failed to publish to bus backend: {0}")]
    Publish(String),
}

/// A frame delivered to a streaming subscriber: the synthetic `connected`
/// control message emitted once at subscription time, or a published
/// [`FanOutMessage`] ("the bus emits a synthetic connected control
/// message first so the client can confirm attachment").
#[derive(Debug, Clone)]
pub enum Frame {
    Connected,
    Message(FanOutMessage),
}

/// Cross-process publish/subscribe channel carrying `new_event`/`status_change`
/// notifications. The worker process (and any API-process background
/// job) publishes by writing JSON to a Redis channel; every API process
/// maintains a single background subscription to that channel and re-fans
/// each message out to its own local, in-process subscribers (one per
/// connected SSE client) over a `tokio::sync::broadcast` channel. Publishing
/// never blocks on subscribers; a subscriber that never polls simply misses
/// messages published meanwhile -- there is no queuing beyond the channel's
/// fixed capacity.
#[derive(Clone)]
pub struct FanOutBus {
    redis: Option<redis::Client>,
    local: broadcast::Sender<FanOutMessage>,
}

impl FanOutBus {
    /// Connects to the Redis instance at `redis_url` (`BUS_REDIS_URL`)
    /// and spawns the background task that bridges
    /// Redis pub/sub messages onto the process-local broadcast channel every
    /// [`FanOutBus::subscribe`] call reads from.
    pub async fn connect(redis_url: &str) -> Result<Self, BusError> {
        let redis = redis::Client::open(redis_url).map_err(|err| BusError::Connect(err.to_string()))?;
        // Fail fast if Redis is entirely unreachable at startup, same posture
        // as `DbClient::connect` and `S3ObjectStore::connect`.
        redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| BusError::Connect(err.to_string()))?;

        let (sender, _receiver) = broadcast::channel(CHANNEL_CAPACITY);
        let bus = Self { redis: Some(redis), local: sender };
        bus.spawn_subscriber_loop();
        Ok(bus)
    }

    /// Builds a bus with no backing Redis connection: `publish` writes
    /// straight onto the process-local broadcast channel instead of a remote
    /// channel, and no subscriber loop is spawned. For integration tests and
    /// any offline/single-process deployment that has no need to fan out
    /// across OS processes.
    pub fn local_only() -> Self {
        let (sender, _receiver) = broadcast::channel(CHANNEL_CAPACITY);
        Self { redis: None, local: sender }
    }

    /// Runs forever in the background, reconnecting on any pub/sub error.
    /// This is the only reader of the Redis channel per process; every local
    /// subscriber fans out from the resulting broadcast sender instead of
    /// opening its own Redis connection.
    fn spawn_subscriber_loop(&self) {
        let Some(redis) = self.redis.clone() else { return };
        let sender = self.local.clone();
        tokio::spawn(async move {
            loop {
                if let Err(err) = run_subscription(&redis, &sender).await {
                    warn!(error = %err, "bus subscription dropped, retrying");
                }
                tokio::time::sleep(RESUBSCRIBE_BACKOFF).await;
            }
        });
    }

    /// Fire-and-forget publish: serializes the message and writes it
    /// to the Redis channel, or straight onto the local broadcast channel
    /// when running in [`FanOutBus::local_only`] mode. Errors are logged
    /// rather than propagated to callers that only hold the
    /// [`FanOutPublisher`] trait object, mirroring how the orchestrator
    /// already treats capability failures as non-fatal per-stage errors.
    #[instrument(skip(self, message))]
    pub async fn publish(&self, message: FanOutMessage) -> Result<(), BusError> {
        let Some(redis) = &self.redis else {
            let _ = self.local.send(message);
            return Ok(());
        };
        let payload = serde_json::to_string(&message).map_err(|err| BusError::Publish(err.to_string()))?;
        let mut connection = redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| BusError::Publish(err.to_string()))?;
        let _: i64 = connection
            .publish(CHANNEL_NAME, payload)
            .await
            .map_err(|err| BusError::Publish(err.to_string()))?;
        Ok(())
    }

    /// Opens a new subscription: a lazy, potentially infinite stream of
    /// [`Frame`]s starting with [`Frame::Connected`]. Dropping the
    /// returned stream releases the underlying broadcast receiver immediately
    /// -- the only resource a subscription holds -- satisfying the
    /// "cleanup on every exit path" requirement without any explicit close
    /// call. This never touches Redis directly; it reads from the
    /// process-local broadcast channel the background subscriber feeds.
    pub fn subscribe(&self) -> Pin<Box<dyn Stream<Item = Frame> + Send>> {
        let receiver = self.local.subscribe();
        let messages = BroadcastStream::new(receiver).filter_map(|item| async move {
            match item {
                Ok(message) => Some(Frame::Message(message)),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged behind fan-out bus, messages dropped");
                    None
                }
            }
        });
        Box::pin(tokio_stream::once(Frame::Connected).chain(messages))
    }
}

async fn run_subscription(redis: &redis::Client, sender: &broadcast::Sender<FanOutMessage>) -> redis::RedisResult<()> {
    let connection = redis.get_async_connection().await?;
    let mut pubsub = connection.into_pubsub();
    pubsub.subscribe(CHANNEL_NAME).await?;
    info!(channel = CHANNEL_NAME, "bus subscription established");

    let mut stream = pubsub.on_message();
    while let Some(msg) = stream.next().await {
        let payload: String = match msg.get_payload() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "bus message had an undecodable payload, dropping");
                continue;
            }
        };
        match serde_json::from_str::<FanOutMessage>(&payload) {
            Ok(message) => {
                if sender.send(message).is_err() {
                    debug!("bus message received with no live local subscribers");
                }
            }
            Err(err) => error!(error = %err, "failed to deserialize bus message, dropping"),
        }
    }
    Ok(())
}

#[async_trait]
impl FanOutPublisher for FanOutBus {
    async fn publish(&self, message: FanOutMessage) -> Result<(), CapabilityError> {
        FanOutBus::publish(self, message).await.map_err(|err| CapabilityError::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attention_domain_models::EventOut;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_event() -> EventOut {
        EventOut {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            latitude: 52.0,
            longitude: 21.0,
            address: None,
            description: "test".to_string(),
            media_url: None,
            media_type: "image".to_string(),
            thumbnail_url: None,
            transcription: String::new(),
            category: "informational".to_string(),
            subcategory: String::new(),
            severity: 1,
            ai_confidence: None,
            cluster_id: None,
            status: "new".to_string(),
            reviewed_by_id: None,
            reviewed_at: None,
        }
    }

    fn local_only_bus() -> FanOutBus {
        FanOutBus::local_only()
    }

    #[tokio::test]
    async fn first_frame_is_always_connected() {
        let bus = local_only_bus();
        let mut stream = bus.subscribe();
        let first = stream.next().await;
        assert!(matches!(first, Some(Frame::Connected)));
    }

    #[tokio::test]
    async fn published_messages_are_delivered_after_connected() {
        let bus = local_only_bus();
        let mut stream = bus.subscribe();
        assert!(matches!(stream.next().await, Some(Frame::Connected)));

        bus.local.send(FanOutMessage::NewEvent { event: sample_event() }).unwrap();

        match stream.next().await {
            Some(Frame::Message(FanOutMessage::NewEvent { .. })) => {}
            other => panic!("expected NewEvent frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropping_a_subscription_does_not_affect_others() {
        let bus = local_only_bus();
        {
            let mut dropped = bus.subscribe();
            assert!(matches!(dropped.next().await, Some(Frame::Connected)));
        }
        let mut survivor = bus.subscribe();
        assert!(matches!(survivor.next().await, Some(Frame::Connected)));
        bus.local.send(FanOutMessage::NewEvent { event: sample_event() }).unwrap();
        assert!(matches!(survivor.next().await, Some(Frame::Message(_))));
    }
}
