//! RedisGraph indexing adapter.
//!
//! RedisGraph is a Redis module that stores a property graph addressable
//! with Cypher through the `GRAPH.QUERY` command. The protocol has no
//! out-of-band bindings, so every statement is rendered with inlined,
//! escaped literals before dispatch.

use std::collections::BTreeMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use graphsync_core::{Entity, EntityKind, QueryResult, QuerySummary, Scalar, Value};

use crate::adapter::{GraphIndex, Params};
use crate::config::IndexConfig;
use crate::cypher;
use crate::error::{IndexError, IndexResult};
use crate::statement::Statement;

/// Index adapter backed by a RedisGraph server.
#[derive(Clone)]
pub struct RedisGraphIndex {
    pool: ConnectionManager,
    graph_name: String,
}

impl RedisGraphIndex {
    /// Connect to Redis. `ConnectionManager` multiplexes internally and
    /// performs the handshake here, so an unreachable server fails fast.
    pub async fn connect(config: &IndexConfig) -> IndexResult<Self> {
        let client = redis::Client::open(config.uri.as_str())?;
        let pool = ConnectionManager::new(client).await?;
        Ok(Self {
            pool,
            graph_name: config.graph_name.clone(),
        })
    }

    /// Direct access to the underlying connection handle, for diagnostics.
    pub fn inner(&self) -> ConnectionManager {
        self.pool.clone()
    }

    async fn run(&self, statement: &Statement) -> IndexResult<QueryResult> {
        let rendered = statement.render_inline();
        debug!(query = %rendered, "dispatching graph query");
        let mut conn = self.pool.clone();
        let reply: redis::Value = redis::cmd("GRAPH.QUERY")
            .arg(&self.graph_name)
            .arg(&rendered)
            .query_async(&mut conn)
            .await?;
        Ok(normalize(parse_reply(reply)))
    }

    async fn index_node(&self, entity: &Entity) -> IndexResult<()> {
        let existing = self.run(&cypher::node_lookup(&entity.id)).await?;
        if existing.is_empty() {
            self.run(&cypher::node_create(&entity.label, &entity.id, &entity.attributes))
                .await?;
        } else {
            self.run(&cypher::node_update(&entity.label, &entity.id, &entity.attributes))
                .await?;
        }
        Ok(())
    }

    async fn index_edge(&self, entity: &Entity) -> IndexResult<()> {
        let (tail, head) = match (&entity.tail, &entity.head) {
            (Some(tail), Some(head)) => (tail, head),
            _ => return Err(IndexError::IncompleteEdge(entity.id.clone())),
        };
        for statement in
            cypher::edge_replace(&entity.label, &entity.id, tail, head, &entity.attributes)
        {
            self.run(&statement).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl GraphIndex for RedisGraphIndex {
    async fn query(&self, text: &str, params: &Params) -> IndexResult<QueryResult> {
        let mut statement = Statement::new(text);
        for (name, value) in params {
            statement = statement.param(name, value.clone());
        }
        self.run(&statement).await
    }

    async fn check_node_uniqueness(
        &self,
        field_name: &str,
        field_value: &Scalar,
        label: Option<&str>,
    ) -> IndexResult<bool> {
        let result = self
            .run(&cypher::uniqueness_check(field_name, field_value, label))
            .await?;
        Ok(matching_nodes(&result) == 0)
    }

    async fn index(&self, entity: &Entity) -> IndexResult<()> {
        info!(id = %entity.id, label = %entity.label, "index request received");
        match entity.kind() {
            Some(EntityKind::Node) => self.index_node(entity).await,
            Some(EntityKind::Edge) => self.index_edge(entity).await,
            None => Err(IndexError::UnrecognizedEntityKind {
                id: entity.id.clone(),
                marker: entity.marker(),
            }),
        }
    }

    async fn node_deleted(&self, id: &str) -> IndexResult<()> {
        info!(%id, "node deletion request received");
        for statement in cypher::cascade_node_delete(id) {
            self.run(&statement).await?;
        }
        Ok(())
    }

    async fn edge_deleted(&self, id: &str) -> IndexResult<()> {
        info!(%id, "edge deletion request received");
        self.run(&cypher::edge_delete(id)).await?;
        Ok(())
    }

    async fn flush(&self) -> IndexResult<()> {
        for statement in cypher::flush() {
            self.run(&statement).await?;
        }
        Ok(())
    }

    async fn create_index(&self, _label: &str, _field_name: &str) -> IndexResult<()> {
        // RedisGraph rejects a duplicate CREATE INDEX instead of treating
        // it as idempotent, so this backend degrades to a no-op.
        Ok(())
    }
}

/// The count column of a uniqueness-check result. RedisGraph reports
/// integers either as protocol integers or as printed strings depending on
/// server version.
fn matching_nodes(result: &QueryResult) -> i64 {
    match result.first_value() {
        Some(Value::Int(v)) => *v,
        Some(Value::Str(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Raw flat response shape: a value list plus statistics keyed snake-case.
#[derive(Default)]
struct GraphReply {
    rows: Vec<Vec<Value>>,
    statistics: BTreeMap<String, String>,
}

/// Split a `GRAPH.QUERY` reply into rows and statistics.
///
/// Mutation-only replies carry a single statistics section; read replies
/// carry `[rows, statistics]` or `[header, rows, statistics]` depending on
/// server version.
fn parse_reply(reply: redis::Value) -> GraphReply {
    let mut sections = match reply {
        redis::Value::Array(sections) => sections,
        _ => return GraphReply::default(),
    };
    match sections.len() {
        1 => GraphReply {
            rows: Vec::new(),
            statistics: parse_statistics(&sections[0]),
        },
        2 => {
            let statistics = parse_statistics(&sections[1]);
            let rows = parse_rows(sections.swap_remove(0));
            GraphReply { rows, statistics }
        }
        3 => {
            let statistics = parse_statistics(&sections[2]);
            let rows = parse_rows(sections.swap_remove(1));
            GraphReply { rows, statistics }
        }
        _ => GraphReply::default(),
    }
}

fn parse_rows(section: redis::Value) -> Vec<Vec<Value>> {
    match section {
        redis::Value::Array(rows) => rows
            .into_iter()
            .map(|row| match row {
                redis::Value::Array(cells) => cells.into_iter().map(scalar_value).collect(),
                other => vec![scalar_value(other)],
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_value(value: redis::Value) -> Value {
    match value {
        redis::Value::Nil => Value::Null,
        redis::Value::Int(v) => Value::Int(v),
        redis::Value::Double(v) => Value::Float(v),
        redis::Value::Boolean(v) => Value::Bool(v),
        redis::Value::BulkString(bytes) => Value::Str(String::from_utf8_lossy(&bytes).into_owned()),
        redis::Value::SimpleString(s) => Value::Str(s),
        // Aggregate cells (nodes, relations) have no scalar projection.
        _ => Value::Null,
    }
}

/// Parse statistics lines such as `"Nodes created: 3"` into a snake-case
/// keyed map (`nodes_created` -> `"3"`).
fn parse_statistics(section: &redis::Value) -> BTreeMap<String, String> {
    let mut statistics = BTreeMap::new();
    let lines = match section {
        redis::Value::Array(lines) => lines,
        _ => return statistics,
    };
    for line in lines {
        let line = match line {
            redis::Value::BulkString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            redis::Value::SimpleString(s) => s.clone(),
            _ => continue,
        };
        if let Some((name, rest)) = line.split_once(':') {
            let key = name.trim().to_lowercase().replace(' ', "_");
            statistics.insert(key, rest.trim().to_string());
        }
    }
    statistics
}

/// Normalize the flat response: the value list becomes the rows verbatim;
/// known counters populate the summary, anything missing defaults to zero.
/// RedisGraph reports no update flag, so `contains_updates` is derived from
/// the mutation counters.
fn normalize(reply: GraphReply) -> QueryResult {
    let mut summary = QuerySummary {
        nodes_created: counter(&reply.statistics, "nodes_created"),
        nodes_deleted: counter(&reply.statistics, "nodes_deleted"),
        edges_created: counter(&reply.statistics, "relationships_created"),
        edges_deleted: counter(&reply.statistics, "relationships_deleted"),
        properties_set: counter(&reply.statistics, "properties_set"),
        contains_updates: false,
    };
    summary.contains_updates = summary.has_mutations();
    QueryResult::new(reply.rows, summary)
}

fn counter(statistics: &BTreeMap<String, String>, key: &str) -> u64 {
    statistics
        .get(key)
        .and_then(|v| v.split_whitespace().next())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
