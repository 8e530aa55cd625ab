//! End-to-end tests against live backends.
//!
//! Ignored by default. Run with a local server:
//!
//! ```text
//! cargo test -p graphsync-index -- --ignored bolt
//! cargo test -p graphsync-index -- --ignored redisgraph
//! ```
//!
//! Both tests flush the destination graph; never point them at data you
//! care about.

use std::collections::BTreeMap;
use std::sync::Arc;

use graphsync_core::{Entity, Scalar, Value};
use graphsync_index::{connect, BackendKind, GraphIndex, IndexConfig, Params};

fn person(id: &str, name: &str) -> Entity {
    Entity {
        id: id.to_string(),
        label: "Person".to_string(),
        attributes: [("name".to_string(), Scalar::from(name))].into(),
        tail: None,
        head: None,
    }
}

fn follows(id: &str, tail: &str, head: &str) -> Entity {
    Entity {
        id: id.to_string(),
        label: "FOLLOWS".to_string(),
        attributes: BTreeMap::new(),
        tail: Some(tail.to_string()),
        head: Some(head.to_string()),
    }
}

fn udid_param(id: &str) -> Params {
    [("udid".to_string(), Scalar::from(id))].into()
}

async fn exercise(adapter: Arc<dyn GraphIndex>) {
    adapter.flush().await.unwrap();

    // Re-indexing the same identity updates in place.
    adapter.index(&person("1a2b", "Ada")).await.unwrap();
    adapter.index(&person("1a2b", "Ada Lovelace")).await.unwrap();
    let names = adapter
        .query(
            "MATCH (n {udid: $udid}) RETURN n.name AS name",
            &udid_param("1a2b"),
        )
        .await
        .unwrap();
    assert_eq!(names.len(), 1, "duplicate node after re-index");
    assert_eq!(
        names.first_value(),
        Some(&Value::Str("Ada Lovelace".to_string()))
    );

    // Uniqueness flips once a matching node exists.
    assert!(adapter
        .check_node_uniqueness("name", &Scalar::from("Grace"), None)
        .await
        .unwrap());
    adapter.index(&person("2c3d", "Grace")).await.unwrap();
    assert!(!adapter
        .check_node_uniqueness("name", &Scalar::from("Grace"), None)
        .await
        .unwrap());

    // Cascade delete removes the node and both incident edges.
    adapter.index(&follows("6f00", "1a2b", "2c3d")).await.unwrap();
    adapter.index(&follows("7f00", "2c3d", "1a2b")).await.unwrap();
    adapter.node_deleted("1a2b").await.unwrap();
    for id in ["6f00", "7f00"] {
        let edges = adapter
            .query(
                "MATCH ()-[e {udid: $udid}]->() RETURN e.udid AS udid",
                &udid_param(id),
            )
            .await
            .unwrap();
        assert!(edges.is_empty(), "edge {id} survived the cascade");
    }
    let nodes = adapter
        .query(
            "MATCH (n {udid: $udid}) RETURN n.udid AS udid",
            &udid_param("1a2b"),
        )
        .await
        .unwrap();
    assert!(nodes.is_empty(), "node survived the cascade");

    // Flush leaves nothing behind.
    adapter.flush().await.unwrap();
    let rest = adapter
        .query(
            "MATCH (n {udid: $udid}) RETURN n.udid AS udid",
            &udid_param("2c3d"),
        )
        .await
        .unwrap();
    assert!(rest.is_empty(), "node survived the flush");
}

#[tokio::test]
#[ignore = "requires a running Neo4j at bolt://localhost:7687"]
async fn bolt_end_to_end() {
    let adapter = connect(&IndexConfig::default()).await.unwrap();
    exercise(adapter).await;
}

#[tokio::test]
#[ignore = "requires a running RedisGraph at redis://127.0.0.1:6379"]
async fn redisgraph_end_to_end() {
    let config = IndexConfig {
        backend: BackendKind::RedisGraph,
        uri: "redis://127.0.0.1:6379".to_string(),
        ..Default::default()
    };
    let adapter = connect(&config).await.unwrap();
    exercise(adapter).await;
}
