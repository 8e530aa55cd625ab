//! Adapter configuration.

use serde::Deserialize;

/// Which backend variant to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Neo4j over the Bolt protocol.
    Bolt,
    /// RedisGraph over the Redis protocol.
    RedisGraph,
}

/// Connection settings for the index adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub backend: BackendKind,
    /// `bolt://` or `redis://` URI depending on the backend.
    pub uri: String,
    pub user: String,
    pub password: String,
    /// RedisGraph key under which the destination graph is stored.
    pub graph_name: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Bolt,
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            graph_name: "index".to_string(),
        }
    }
}
