//! Canonical query result model.
//!
//! Every backend response is normalized into this shape at the adapter
//! boundary; backend-specific response objects never travel further.

use serde::{Deserialize, Serialize};

use crate::entity::Scalar;

/// A value returned by the destination graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(v) => Value::Bool(v),
            Scalar::Int(v) => Value::Int(v),
            Scalar::Float(v) => Value::Float(v),
            Scalar::Str(v) => Value::Str(v),
        }
    }
}

/// Mutation statistics reported by the destination store.
///
/// Counters default to zero and `contains_updates` to false when the
/// backend reports no statistics at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySummary {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub edges_created: u64,
    pub edges_deleted: u64,
    pub properties_set: u64,
    pub contains_updates: bool,
}

impl QuerySummary {
    /// True if any mutation counter is non-zero.
    pub fn has_mutations(&self) -> bool {
        self.nodes_created > 0
            || self.nodes_deleted > 0
            || self.edges_created > 0
            || self.edges_deleted > 0
            || self.properties_set > 0
    }
}

/// The backend-agnostic result of a query execution: returned rows plus a
/// mutation summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    rows: Vec<Vec<Value>>,
    summary: QuerySummary,
}

impl QueryResult {
    pub fn new(rows: Vec<Vec<Value>>, summary: QuerySummary) -> Self {
        Self { rows, summary }
    }

    /// The returned records, one value per returned column.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn summary(&self) -> &QuerySummary {
        &self.summary
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The first value of the first row, if any.
    pub fn first_value(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }
}
