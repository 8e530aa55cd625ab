//! Cypher statement builders for every mutation intent.
//!
//! Pure functions from intent + entity data to [`Statement`]s. The reserved
//! `udid` attribute is injected into every create/update so the store copy
//! stays keyed by identity; the injected value wins over a caller attribute
//! of the same name. Labels and attribute names are interpolated verbatim
//! (validating them is the caller's responsibility); attribute values
//! always travel as named bindings.

use std::collections::BTreeMap;

use graphsync_core::entity::UDID;
use graphsync_core::Scalar;

use crate::statement::Statement;

/// Match a node by identity and return its identity column.
pub fn node_lookup(id: &str) -> Statement {
    Statement::new("MATCH (n {udid: $udid}) RETURN n.udid AS udid").param(UDID, id)
}

/// Create a node with the given label and attributes.
pub fn node_create(label: &str, id: &str, attributes: &BTreeMap<String, Scalar>) -> Statement {
    let merged = with_identity(id, attributes);
    let props: Vec<String> = merged.keys().map(|k| format!("{k}: ${k}")).collect();
    let mut statement = Statement::new(format!("CREATE (n:{} {{{}}})", label, props.join(", ")));
    for (name, value) in merged {
        statement = statement.param(&name, value);
    }
    statement
}

/// Match a node by identity and label, then overwrite its attributes in
/// place. Unreferenced properties and the label are left untouched.
pub fn node_update(label: &str, id: &str, attributes: &BTreeMap<String, Scalar>) -> Statement {
    let merged = with_identity(id, attributes);
    let sets: Vec<String> = merged.keys().map(|k| format!("n.{k} = ${k}")).collect();
    let mut statement = Statement::new(format!(
        "MATCH (n:{} {{udid: $udid}}) SET {}",
        label,
        sets.join(", ")
    ));
    for (name, value) in merged {
        statement = statement.param(&name, value);
    }
    statement
}

/// Replace-on-write for edges: delete any edge carrying this identity, then
/// create a fresh edge between `tail` and `head`.
///
/// Two independent statements; they are not wrapped in a transaction.
/// Endpoint bindings are named `t_udid`/`h_udid` so edge attributes can
/// never collide with them.
pub fn edge_replace(
    label: &str,
    id: &str,
    tail: &str,
    head: &str,
    attributes: &BTreeMap<String, Scalar>,
) -> [Statement; 2] {
    let merged = with_identity(id, attributes);
    let props: Vec<String> = merged.keys().map(|k| format!("{k}: ${k}")).collect();
    let mut create = Statement::new(format!(
        "MATCH (t {{udid: $t_udid}}), (h {{udid: $h_udid}}) CREATE (t)-[e:{} {{{}}}]->(h)",
        label,
        props.join(", ")
    ))
    .param("t_udid", tail)
    .param("h_udid", head);
    for (name, value) in merged {
        create = create.param(&name, value);
    }
    [edge_delete(id), create]
}

/// Cascade delete for a node: outgoing edges, incoming edges, then the node
/// itself. Three independent statements.
pub fn cascade_node_delete(id: &str) -> [Statement; 3] {
    [
        Statement::new("MATCH (n {udid: $udid})-[e]->() DELETE e").param(UDID, id),
        Statement::new("MATCH ()-[e]->(n {udid: $udid}) DELETE e").param(UDID, id),
        Statement::new("MATCH (n {udid: $udid}) DELETE n").param(UDID, id),
    ]
}

/// Delete the single edge carrying this identity.
pub fn edge_delete(id: &str) -> Statement {
    Statement::new("MATCH ()-[e {udid: $udid}]->() DELETE e").param(UDID, id)
}

/// Delete the entire destination graph: all edges, then all nodes.
pub fn flush() -> [Statement; 2] {
    [
        Statement::new("MATCH ()-[e]->() DELETE e"),
        Statement::new("MATCH (n) DELETE n"),
    ]
}

/// Count nodes (optionally restricted to a label) whose `field_name` equals
/// `field_value`.
pub fn uniqueness_check(field_name: &str, field_value: &Scalar, label: Option<&str>) -> Statement {
    let label_part = label
        .filter(|l| !l.is_empty())
        .map(|l| format!(":{l}"))
        .unwrap_or_default();
    Statement::new(format!(
        "MATCH (n{label_part} {{{field_name}: $value}}) RETURN count(n) AS matches"
    ))
    .param("value", field_value.clone())
}

/// Create a supporting index on a label/field pair. Idempotent.
pub fn index_create(label: &str, field_name: &str) -> Statement {
    Statement::new(format!(
        "CREATE INDEX IF NOT EXISTS FOR (n:{label}) ON (n.{field_name})"
    ))
}

fn with_identity(id: &str, attributes: &BTreeMap<String, Scalar>) -> BTreeMap<String, Scalar> {
    let mut merged = attributes.clone();
    merged.insert(UDID.to_string(), Scalar::from(id));
    merged
}
