//! # Graphsync Index
//!
//! The indexing adapter layer: mirrors node/edge mutations from the primary
//! graph into an external graph store.
//!
//! Two adapter variants sit behind the [`GraphIndex`] contract: Neo4j over
//! Bolt and RedisGraph over the Redis protocol. Both classify incoming
//! entities, build idempotent Cypher statements, dispatch them, and
//! normalize the backend response into the canonical
//! [`QueryResult`](graphsync_core::QueryResult).

pub mod adapter;
pub mod bolt;
pub mod config;
pub mod cypher;
pub mod error;
pub mod redisgraph;
pub mod statement;
pub mod subscriber;

pub use adapter::{connect, GraphIndex, Params};
pub use bolt::BoltIndex;
pub use config::{BackendKind, IndexConfig};
pub use error::{IndexError, IndexResult};
pub use redisgraph::RedisGraphIndex;
pub use statement::Statement;
pub use subscriber::subscribe;
