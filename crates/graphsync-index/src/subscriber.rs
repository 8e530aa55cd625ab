//! Binds graph mutation signals to an index adapter.
//!
//! One subscription per adapter, registered at construction time by the
//! host. Handlers are fire-and-forget: a failed synchronization is logged
//! and never acknowledged back to the event source, and the originating
//! mutation is not rolled back.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use graphsync_core::{EventReceiver, GraphEvent};

use crate::adapter::GraphIndex;

/// Spawn a task that drives `adapter` from the mutation event stream.
///
/// Each event is handled to completion before the next is received, so a
/// single subscription never runs two statement sequences concurrently.
/// The task ends once every event sender has been dropped.
pub fn subscribe(adapter: Arc<dyn GraphIndex>, mut events: EventReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(GraphEvent::EntityTouched { entity }) => {
                    if let Err(error) = adapter.index(&entity).await {
                        warn!(id = %entity.id, %error, "failed to index entity");
                    }
                }
                Ok(GraphEvent::NodeRemoved { id }) => {
                    if let Err(error) = adapter.node_deleted(&id).await {
                        warn!(%id, %error, "failed to cascade node deletion");
                    }
                }
                Ok(GraphEvent::EdgeRemoved { id }) => {
                    if let Err(error) = adapter.edge_deleted(&id).await {
                        warn!(%id, %error, "failed to delete edge");
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "event stream lagged, mutations were dropped");
                }
                Err(RecvError::Closed) => {
                    info!("event stream closed, stopping index subscription");
                    break;
                }
            }
        }
    })
}
