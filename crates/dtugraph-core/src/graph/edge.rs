//! Graph edges
//!
//! Edges are undirected for every view computation: highlight neighborhoods
//! and filtering only care whether two nodes are connected. `source`/`target`
//! are kept so render adapters can draw arrows.

use serde::{Deserialize, Serialize};

/// An edge between two knowledge nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// ID of the source node
    pub source: String,
    /// ID of the target node
    pub target: String,
    /// Strength of the connection
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Optional relationship label
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
}

fn default_weight() -> f32 {
    1.0
}

impl GraphEdge {
    /// Create a new edge with the default weight
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: default_weight(),
            edge_type: None,
        }
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the relationship label
    pub fn with_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Check whether the edge has `id` as either endpoint
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// Endpoint opposite to `id`, if the edge touches it
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Check whether this edge connects `a` and `b` in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_defaults() {
        let edge: GraphEdge = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert_eq!(edge.weight, 1.0);
        assert_eq!(edge.edge_type, None);
    }

    #[test]
    fn test_edge_type_field_name() {
        let edge: GraphEdge =
            serde_json::from_str(r#"{"source":"a","target":"b","type":"cites","weight":0.4}"#)
                .unwrap();
        assert_eq!(edge.edge_type.as_deref(), Some("cites"));
        assert_eq!(edge.weight, 0.4);

        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains(r#""type":"cites""#));
    }

    #[test]
    fn test_endpoints() {
        let edge = GraphEdge::new("a", "b").with_type("supports");

        assert!(edge.touches("a"));
        assert!(!edge.touches("c"));
        assert_eq!(edge.other_end("a"), Some("b"));
        assert_eq!(edge.other_end("b"), Some("a"));
        assert_eq!(edge.other_end("c"), None);
        assert!(edge.connects("b", "a"));
        assert!(!edge.is_self_loop());
        assert!(GraphEdge::new("a", "a").is_self_loop());
    }
}
