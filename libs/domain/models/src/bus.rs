// [libs/domain/models/src/bus.rs]
use crate::event::EventOut;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// A message carried on the fan-out bus. Serialized as the SSE
/// `data:` payload and, before that, as the sole payload type of the
/// in-process broadcast channel.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FanOutMessage {
    /// Emitted once a freshly enriched event finishes the pipeline.
    NewEvent { event: EventOut },
    /// Emitted when an operator triage command changes an event's status.
    StatusChange { event: EventOut },
}
