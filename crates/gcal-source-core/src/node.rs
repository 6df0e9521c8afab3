//! Content node model.
//!
//! A [`ContentNode`] is the host framework's generic unit of queryable data:
//! a derived ID, parent/children links, the pass-through payload fields and an
//! `internal` block holding the type tag, the serialized payload and its
//! digest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::digest::content_digest;

/// Top-level keys owned by the node itself.
///
/// Payload fields with these names are not flattened onto the node; the
/// complete payload is still available in `internal.content`.
pub const RESERVED_FIELDS: &[&str] = &["id", "parent", "children", "internal", "fields"];

/// Errors raised while building or emitting nodes.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The payload could not be serialized.
    #[error("failed to serialize {node_type} payload: {source}")]
    Serialize {
        node_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload did not serialize to a JSON object.
    #[error("{node_type} payload must serialize to a JSON object")]
    NotAnObject { node_type: String },

    /// The sink refused the node.
    #[error("node {id} was rejected: {message}")]
    Rejected { id: String, message: String },
}

/// The `internal` block of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInternal {
    /// Node type tag, e.g. `Calendar`.
    #[serde(rename = "type")]
    pub node_type: String,
    /// The full payload serialized as JSON.
    pub content: String,
    /// Digest of `content`.
    pub content_digest: String,
}

/// A node handed to the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub internal: NodeInternal,
}

impl ContentNode {
    /// Builds a node of `node_type` from a serializable payload.
    ///
    /// The payload is canonicalized through [`serde_json::Value`] (object keys
    /// sorted) before being stored as `internal.content`, so the digest only
    /// changes when the data does.
    pub fn from_payload<T: Serialize>(
        id: impl Into<String>,
        node_type: impl Into<String>,
        payload: &T,
    ) -> Result<Self, NodeError> {
        let node_type = node_type.into();
        let value = serde_json::to_value(payload).map_err(|source| NodeError::Serialize {
            node_type: node_type.clone(),
            source,
        })?;
        let Value::Object(object) = value else {
            return Err(NodeError::NotAnObject { node_type });
        };

        let content = Value::Object(object.clone()).to_string();
        let content_digest = content_digest(&content);

        let fields = object
            .into_iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .collect();

        Ok(Self {
            id: id.into(),
            parent: None,
            children: Vec::new(),
            fields,
            internal: NodeInternal {
                node_type,
                content,
                content_digest,
            },
        })
    }

    /// Builder method to set the parent node ID.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Appends a child node ID.
    pub fn push_child(&mut self, child: impl Into<String>) {
        self.children.push(child.into());
    }

    /// Returns the node type tag.
    pub fn node_type(&self) -> &str {
        &self.internal.node_type
    }

    /// Returns the content digest.
    pub fn content_digest(&self) -> &str {
        &self.internal.content_digest
    }
}

/// Receives nodes produced by a source run.
///
/// This is the host framework's `createNode` callback. A failing sink aborts
/// the run; nodes already accepted are not rolled back.
pub trait NodeSink {
    fn create_node(&mut self, node: ContentNode) -> Result<(), NodeError>;
}

impl NodeSink for Vec<ContentNode> {
    fn create_node(&mut self, node: ContentNode) -> Result<(), NodeError> {
        self.push(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_from_payload() {
        let payload = json!({"id": "evt1", "summary": "Standup", "status": "confirmed"});
        let node = ContentNode::from_payload("node-1", "CalendarEvent", &payload).unwrap();

        assert_eq!(node.id, "node-1");
        assert_eq!(node.node_type(), "CalendarEvent");
        assert!(node.parent.is_none());
        assert!(node.children.is_empty());
        assert_eq!(node.fields.get("summary"), Some(&json!("Standup")));
        assert!(!node.fields.contains_key("id"));
        assert_eq!(
            node.internal.content,
            r#"{"id":"evt1","status":"confirmed","summary":"Standup"}"#
        );
        assert_eq!(node.content_digest(), content_digest(&node.internal.content));
    }

    #[test]
    fn digest_ignores_upstream_key_order() {
        let a: Value = serde_json::from_str(r#"{"id":"x","b":1,"a":2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":2,"id":"x","b":1}"#).unwrap();
        let na = ContentNode::from_payload("n", "T", &a).unwrap();
        let nb = ContentNode::from_payload("n", "T", &b).unwrap();
        assert_eq!(na.content_digest(), nb.content_digest());
    }

    #[test]
    fn reserved_fields_are_not_flattened() {
        let payload = json!({
            "id": "1",
            "parent": "p",
            "children": [],
            "internal": {},
            "fields": {},
            "kind": "x"
        });
        let node = ContentNode::from_payload("n", "T", &payload).unwrap();
        assert_eq!(node.fields.len(), 1);
        assert!(node.internal.content.contains("\"parent\":\"p\""));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = ContentNode::from_payload("n", "Calendar", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, NodeError::NotAnObject { .. }));
        assert!(err.to_string().contains("Calendar"));
    }

    #[test]
    fn node_serialization_shape() {
        let payload = json!({"id": "c1", "summary": "Work"});
        let mut node = ContentNode::from_payload("cal", "Calendar", &payload).unwrap();
        node.push_child("evt");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["id"], "cal");
        assert_eq!(value["parent"], Value::Null);
        assert_eq!(value["children"], json!(["evt"]));
        assert_eq!(value["summary"], "Work");
        assert_eq!(value["internal"]["type"], "Calendar");
        assert!(value["internal"]["contentDigest"].is_string());
    }

    #[test]
    fn vec_sink_collects_nodes() {
        let mut sink: Vec<ContentNode> = Vec::new();
        let node = ContentNode::from_payload("n", "T", &json!({"id": "1"})).unwrap();
        sink.create_node(node.clone()).unwrap();
        assert_eq!(sink, vec![node]);
    }
}
