//! Error types for the indexing adapter layer.

use thiserror::Error;

/// Failures surfaced by index adapters.
///
/// Transport errors are propagated unmodified; this layer performs no
/// retry, recovery, or rollback of partially applied statement sequences.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("unrecognized entity kind with marker {marker:?} for id {id}")]
    UnrecognizedEntityKind { id: String, marker: Option<char> },

    #[error("edge {0} is missing a tail or head endpoint")]
    IncompleteEdge(String),

    #[error("bolt transport error: {0}")]
    Bolt(#[from] neo4rs::Error),

    #[error("redis transport error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
