//! Graphsync Core Library
//!
//! Backend-agnostic building blocks for mirroring an in-process property
//! graph into an external graph store: the entity wire shape, the mutation
//! event channel, and the canonical query result model.

pub mod entity;
pub mod event;
pub mod result;

pub use entity::{Entity, EntityKind, Scalar};
pub use event::{event_channel, EventReceiver, EventSender, GraphEvent};
pub use result::{QueryResult, QuerySummary, Value};
