//! Mutation events delivered by the primary graph engine.
//!
//! Uses a tokio broadcast channel for in-process delivery. The channel is
//! handed to subscribers explicitly; there is no process-global bus.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default capacity of the event channel before slow receivers lag.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A graph mutation signal.
///
/// Delivery is at-least-once; receivers must tolerate replays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GraphEvent {
    /// A node or edge was created or updated.
    EntityTouched { entity: crate::Entity },
    /// A node was removed from the primary graph.
    NodeRemoved { id: String },
    /// An edge was removed from the primary graph.
    EdgeRemoved { id: String },
}

/// Type alias for the event sender.
pub type EventSender = broadcast::Sender<GraphEvent>;

/// Type alias for the event receiver.
pub type EventReceiver = broadcast::Receiver<GraphEvent>;

/// Create a new event channel with default capacity.
pub fn event_channel() -> EventSender {
    let (tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    tx
}
