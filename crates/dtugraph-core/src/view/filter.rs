//! Tier filtering
//!
//! Produces the subset of the model eligible for rendering. Edges survive
//! only when both endpoints survive, which also removes edges that point at
//! ids the model never had.

use std::collections::HashMap;

use crate::graph::{GraphEdge, GraphModel, GraphNode};

use super::state::TierSet;

/// The filtered view of the graph currently eligible for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSubset {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
    dropped_edges: usize,
}

impl VisibleSubset {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Ids of visible nodes, in model order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Visible edge from `a` to `b`, or else the first one from `b` to `a`
    pub fn find_edge(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|e| e.source == a && e.target == b)
            .or_else(|| self.edges.iter().find(|e| e.connects(a, b)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Model edges that did not make it into the subset
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }
}

/// Select the nodes whose tier is in `tiers` and the edges between them
///
/// Nodes without a tier never match. An empty tier set yields an empty
/// subset. Model order is preserved for both nodes and edges.
pub fn filter(model: &GraphModel, tiers: &TierSet) -> VisibleSubset {
    let nodes: Vec<GraphNode> = model
        .nodes()
        .iter()
        .filter(|n| tiers.matches(n.tier))
        .cloned()
        .collect();

    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    let edges: Vec<GraphEdge> = model
        .edges()
        .iter()
        .filter(|e| index.contains_key(&e.source) && index.contains_key(&e.target))
        .cloned()
        .collect();

    let dropped_edges = model.edge_count() - edges.len();

    VisibleSubset {
        nodes,
        edges,
        index,
        dropped_edges,
    }
}
