//! Immutable graph snapshot
//!
//! A `GraphModel` is built once from the caller's node/edge lists and then
//! only read. Supplying new data means building a new model; there is no
//! incremental patching.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

use super::edge::GraphEdge;
use super::node::GraphNode;

/// Wire shape of a graph file or payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default, alias = "links")]
    pub edges: Vec<GraphEdge>,
}

/// All known nodes and edges for a session
///
/// Node ids are unique: the first occurrence of an id wins and later
/// duplicates are dropped. Edges are kept verbatim, including edges whose
/// endpoints are missing; those are removed by the view filter.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
    dropped_duplicates: usize,
}

impl GraphModel {
    /// Build a model from caller-supplied lists
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());
        let mut dropped_duplicates = 0;

        for mut node in nodes {
            if index.contains_key(&node.id) {
                warn!(node_id = %node.id, "Dropping node with duplicate id");
                dropped_duplicates += 1;
                continue;
            }
            if node.label.is_empty() {
                node.label = node.id.clone();
            }
            index.insert(node.id.clone(), kept.len());
            kept.push(node);
        }

        debug!(
            nodes = kept.len(),
            edges = edges.len(),
            dropped_duplicates,
            "Built graph model"
        );

        Self {
            nodes: kept,
            edges,
            index,
            dropped_duplicates,
        }
    }

    /// An empty model
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a model from a JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        let data: GraphData = serde_json::from_str(json)?;
        Ok(data.into())
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Number of nodes discarded because their id was already taken
    pub fn dropped_duplicates(&self) -> usize {
        self.dropped_duplicates
    }

    /// Edges referencing at least one id absent from the model
    pub fn dangling_edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges
            .iter()
            .filter(|e| !self.contains(&e.source) || !self.contains(&e.target))
    }

    /// Distinct neighbor ids of a node across the whole model
    ///
    /// A self-loop does not make a node its own neighbor.
    pub fn degree(&self, id: &str) -> usize {
        let mut neighbors: Vec<&str> = self
            .edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .filter_map(|e| e.other_end(id))
            .filter(|other| self.contains(other))
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors.len()
    }
}

impl From<GraphData> for GraphModel {
    fn from(data: GraphData) -> Self {
        Self::new(data.nodes, data.edges)
    }
}
