//! The indexing contract shared by every backend variant.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use graphsync_core::{Entity, QueryResult, Scalar};

use crate::bolt::BoltIndex;
use crate::config::{BackendKind, IndexConfig};
use crate::error::IndexResult;
use crate::redisgraph::RedisGraphIndex;

/// Named parameter bindings for a raw query.
pub type Params = BTreeMap<String, Scalar>;

/// An index adapter: mirrors graph mutations into one destination store.
///
/// Implementations are stateless between calls; they own nothing but the
/// backend connection handle. Multi-statement operations (edge replace,
/// cascade delete, flush) run as independent statements, so a transport
/// failure mid-sequence leaves the destination partially applied.
#[async_trait]
pub trait GraphIndex: Send + Sync {
    /// Execute arbitrary query text with named parameter bindings and
    /// return the canonical result. A raw passthrough for diagnostic use;
    /// no classification or statement building applies.
    async fn query(&self, text: &str, params: &Params) -> IndexResult<QueryResult>;

    /// True iff zero nodes match `field_name = field_value`, optionally
    /// restricted to `label`.
    async fn check_node_uniqueness(
        &self,
        field_name: &str,
        field_value: &Scalar,
        label: Option<&str>,
    ) -> IndexResult<bool>;

    /// Synchronize one entity: classify it by identity marker and upsert a
    /// node or replace an edge. Fails with
    /// [`UnrecognizedEntityKind`](crate::IndexError::UnrecognizedEntityKind)
    /// when the marker is outside the valid ranges.
    async fn index(&self, entity: &Entity) -> IndexResult<()>;

    /// Cascade delete: every edge where the node is tail, every edge where
    /// it is head, then the node itself.
    async fn node_deleted(&self, id: &str) -> IndexResult<()>;

    /// Delete the single edge with this identity.
    async fn edge_deleted(&self, id: &str) -> IndexResult<()>;

    /// Delete the entire destination graph, edges before nodes.
    /// Irreversible; intended for reset and test scenarios.
    async fn flush(&self) -> IndexResult<()>;

    /// Ask the backend for a supporting index on a label/field pair.
    /// Idempotent where supported; a no-op is an acceptable degradation.
    async fn create_index(&self, label: &str, field_name: &str) -> IndexResult<()>;
}

/// Connect the adapter variant selected by `config`.
pub async fn connect(config: &IndexConfig) -> IndexResult<Arc<dyn GraphIndex>> {
    match config.backend {
        BackendKind::Bolt => Ok(Arc::new(BoltIndex::connect(config).await?)),
        BackendKind::RedisGraph => Ok(Arc::new(RedisGraphIndex::connect(config).await?)),
    }
}
