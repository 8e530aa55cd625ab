//! Neo4j indexing adapter over the Bolt protocol.
//!
//! Bolt is stateful and binary, so it is the preferred way to reach Neo4j.
//! Parameter bindings travel out-of-band; query text never carries inlined
//! literals on this backend.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use tracing::{debug, info};

use graphsync_core::{Entity, EntityKind, QueryResult, QuerySummary, Scalar, Value};

use crate::adapter::{GraphIndex, Params};
use crate::config::IndexConfig;
use crate::cypher;
use crate::error::{IndexError, IndexResult};
use crate::statement::Statement;

/// Index adapter backed by a Neo4j server.
#[derive(Clone)]
pub struct BoltIndex {
    graph: Graph,
}

impl BoltIndex {
    /// Connect to Neo4j.
    ///
    /// neo4rs uses a lazy pool, so `Graph::connect` only creates the pool
    /// object. A cheap `RETURN 1` ping forces the TCP+bolt handshake so an
    /// unreachable server fails here instead of on the first event.
    pub async fn connect(config: &IndexConfig) -> IndexResult<Self> {
        let bolt_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db("neo4j")
            .max_connections(4)
            .fetch_size(64)
            .build()?;

        let graph = Graph::connect(bolt_config).await?;
        graph.run(Query::new("RETURN 1".to_string())).await?;

        Ok(Self { graph })
    }

    /// Direct access to the underlying driver handle, for diagnostics.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    async fn run(&self, statement: &Statement) -> IndexResult<QueryResult> {
        debug!(query = statement.text(), "dispatching bolt statement");
        let mut query = Query::new(statement.text().to_string());
        for (name, value) in statement.params() {
            query = match value {
                Scalar::Bool(v) => query.param(name, *v),
                Scalar::Int(v) => query.param(name, *v),
                Scalar::Float(v) => query.param(name, *v),
                Scalar::Str(v) => query.param(name, v.as_str()),
            };
        }

        let mut stream = self.graph.execute(query).await?;
        let mut records = Vec::new();
        while let Some(row) = stream.next().await? {
            records.push(convert_row(&row));
        }
        // The stable driver API surfaces rows but not mutation counters, so
        // the summary degrades to its zero/false defaults.
        Ok(normalize(BoltResponse {
            records,
            statistics: None,
        }))
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
impl GraphIndex for BoltIndex {
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
        let matches = result.first_value().and_then(Value::as_int).unwrap_or(0);
        Ok(matches == 0)
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

    async fn create_index(&self, label: &str, field_name: &str) -> IndexResult<()> {
        self.run(&cypher::index_create(label, field_name)).await?;
        Ok(())
    }
}

/// Raw row-oriented response shape: ordered records of typed values plus an
/// optional mutation-statistics object.
struct BoltResponse {
    records: Vec<BoltRecord>,
    statistics: Option<BoltStatistics>,
}

struct BoltRecord {
    values: Vec<BoltValue>,
}

enum BoltValue {
    Scalar(Value),
    /// A returned node or relationship, reduced to its property map.
    Entity(Vec<(String, Value)>),
}

#[derive(Default)]
struct BoltStatistics {
    nodes_created: u64,
    nodes_deleted: u64,
    relationships_created: u64,
    relationships_deleted: u64,
    properties_set: u64,
    contains_updates: bool,
}

impl From<BoltStatistics> for QuerySummary {
    fn from(stats: BoltStatistics) -> Self {
        QuerySummary {
            nodes_created: stats.nodes_created,
            nodes_deleted: stats.nodes_deleted,
            edges_created: stats.relationships_created,
            edges_deleted: stats.relationships_deleted,
            properties_set: stats.properties_set,
            contains_updates: stats.contains_updates,
        }
    }
}

/// Normalize the row-oriented response: the first value of each record
/// becomes the row. An entity contributes its property values, a scalar a
/// one-element row. Absent statistics degrade to the zero/false summary.
fn normalize(response: BoltResponse) -> QueryResult {
    let rows = response
        .records
        .into_iter()
        .map(|record| match record.values.into_iter().next() {
            Some(BoltValue::Entity(props)) => props.into_iter().map(|(_, v)| v).collect(),
            Some(BoltValue::Scalar(value)) => vec![value],
            None => Vec::new(),
        })
        .collect();
    let summary = response
        .statistics
        .map(QuerySummary::from)
        .unwrap_or_default();
    QueryResult::new(rows, summary)
}

fn convert_row(row: &neo4rs::Row) -> BoltRecord {
    match row.to::<serde_json::Value>() {
        Ok(serde_json::Value::Object(columns)) => BoltRecord {
            values: columns.into_iter().map(|(_, v)| bolt_value(v)).collect(),
        },
        Ok(other) => BoltRecord {
            values: vec![bolt_value(other)],
        },
        Err(error) => {
            debug!(%error, "failed to decode bolt row");
            BoltRecord { values: Vec::new() }
        }
    }
}

fn bolt_value(value: serde_json::Value) -> BoltValue {
    match value {
        serde_json::Value::Object(props) => BoltValue::Entity(
            props
                .into_iter()
                .map(|(name, v)| (name, json_scalar(v)))
                .collect(),
        ),
        other => BoltValue::Scalar(json_scalar(other)),
    }
}

fn json_scalar(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Str(s),
        // Lists and nested structures have no scalar projection.
        _ => Value::Null,
    }
}
