//! Entity wire shape and identity classification.
//!
//! Every identifier carries its entity kind in the leading character:
//! parsed as a hexadecimal digit, 1-5 means node and 6-10 means edge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved attribute name under which an entity's identifier is stored
/// inside the destination graph.
pub const UDID: &str = "udid";

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A node or edge record delivered to the indexing layer.
///
/// Transient: constructed by the primary graph engine at mutation time and
/// dropped once the synchronization call returns. `tail`/`head` are set for
/// edges only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

impl Entity {
    /// The identity marker: the leading character of the id.
    pub fn marker(&self) -> Option<char> {
        self.id.chars().next()
    }

    /// Classify this entity from its identity marker.
    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::classify(&self.id)
    }
}

/// Entity kind derived from the identity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Node,
    Edge,
}

impl EntityKind {
    /// Classify an identifier by its leading hex digit.
    ///
    /// Returns `None` for 0, values above 10, a non-hex leading character,
    /// or an empty id.
    pub fn classify(id: &str) -> Option<EntityKind> {
        let marker = id.chars().next()?.to_digit(16)?;
        match marker {
            1..=5 => Some(EntityKind::Node),
            6..=10 => Some(EntityKind::Edge),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_markers() {
        for id in ["1a2b", "2000", "3fff", "4abc", "5d6e"] {
            assert_eq!(EntityKind::classify(id), Some(EntityKind::Node), "{id}");
        }
    }

    #[test]
    fn test_edge_markers() {
        // 6-9 plus hex 'a' (10) are edges, upper or lower case.
        for id in ["6a2b", "7000", "8fff", "9abc", "a123", "A123"] {
            assert_eq!(EntityKind::classify(id), Some(EntityKind::Edge), "{id}");
        }
    }

    #[test]
    fn test_invalid_markers() {
        for id in ["0abc", "b123", "cdef", "f000", "zzzz", "-1ab", ""] {
            assert_eq!(EntityKind::classify(id), None, "{id:?}");
        }
    }

    #[test]
    fn test_entity_kind_and_marker() {
        let entity = Entity {
            id: "1a2b".to_string(),
            label: "Person".to_string(),
            attributes: BTreeMap::new(),
            tail: None,
            head: None,
        };
        assert_eq!(entity.kind(), Some(EntityKind::Node));
        assert_eq!(entity.marker(), Some('1'));
    }

    #[test]
    fn test_scalar_deserialization() {
        let attrs: BTreeMap<String, Scalar> =
            serde_json::from_str(r#"{"name":"Ada","age":36,"score":9.5,"active":true}"#).unwrap();
        assert_eq!(attrs["name"], Scalar::Str("Ada".to_string()));
        assert_eq!(attrs["age"], Scalar::Int(36));
        assert_eq!(attrs["score"], Scalar::Float(9.5));
        assert_eq!(attrs["active"], Scalar::Bool(true));
    }

    #[test]
    fn test_entity_deserialization_defaults() {
        let entity: Entity =
            serde_json::from_str(r#"{"id":"1a2b","label":"Person"}"#).unwrap();
        assert!(entity.attributes.is_empty());
        assert!(entity.tail.is_none());
        assert!(entity.head.is_none());
    }
}
