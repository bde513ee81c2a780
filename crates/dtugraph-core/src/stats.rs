//! Graph statistics
//!
//! Summaries of a loaded model for the `stats` command and for diagnosing
//! graph files before they are viewed.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::graph::{GraphModel, Tier};

/// Statistics about a graph model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    /// Total number of nodes
    pub total_nodes: usize,
    /// Total number of edges, dangling ones included
    pub total_edges: usize,
    /// Breakdown by tier
    pub nodes_by_tier: BTreeMap<Tier, usize>,
    /// Nodes with no tier or an unrecognized one
    pub untiered_nodes: usize,
    /// Edges with an endpoint missing from the model
    pub dangling_edges: usize,
    /// Nodes not touched by any edge
    pub isolated_nodes: usize,
    /// Breakdown by relationship label; unlabeled edges are not counted
    pub edges_by_type: BTreeMap<String, usize>,
    /// Duplicate node ids dropped when the model was built
    pub dropped_duplicates: usize,
    /// Average resonance over nodes that carry one
    pub average_resonance: Option<f32>,
}

impl GraphStatistics {
    /// Compute statistics for `model`
    pub fn compute(model: &GraphModel) -> Self {
        let mut nodes_by_tier: BTreeMap<Tier, usize> = BTreeMap::new();
        let mut untiered_nodes = 0;
        let mut resonance_total = 0.0f32;
        let mut resonance_count = 0usize;

        for node in model.nodes() {
            match node.tier {
                Some(tier) => *nodes_by_tier.entry(tier).or_insert(0) += 1,
                None => untiered_nodes += 1,
            }
            if let Some(resonance) = node.resonance {
                resonance_total += resonance;
                resonance_count += 1;
            }
        }

        let mut edges_by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut connected: HashSet<&str> = HashSet::new();
        for edge in model.edges() {
            if let Some(edge_type) = &edge.edge_type {
                *edges_by_type.entry(edge_type.clone()).or_insert(0) += 1;
            }
            connected.insert(&edge.source);
            connected.insert(&edge.target);
        }

        let isolated_nodes = model
            .nodes()
            .iter()
            .filter(|n| !connected.contains(n.id.as_str()))
            .count();

        let average_resonance =
            (resonance_count > 0).then(|| resonance_total / resonance_count as f32);

        Self {
            total_nodes: model.node_count(),
            total_edges: model.edge_count(),
            nodes_by_tier,
            untiered_nodes,
            dangling_edges: model.dangling_edges().count(),
            isolated_nodes,
            edges_by_type,
            dropped_duplicates: model.dropped_duplicates(),
            average_resonance,
        }
    }
}

/// Format graph statistics for display
pub fn format_stats(stats: &GraphStatistics) -> String {
    let mut output = String::new();

    output.push_str("Knowledge Graph Statistics\n");
    output.push_str("==========================\n\n");

    output.push_str(&format!("Total Nodes:         {}\n", stats.total_nodes));
    output.push_str(&format!("Total Edges:         {}\n", stats.total_edges));
    output.push_str(&format!("Untiered Nodes:      {}\n", stats.untiered_nodes));
    output.push_str(&format!("Isolated Nodes:      {}\n", stats.isolated_nodes));
    output.push_str(&format!("Dangling Edges:      {}\n", stats.dangling_edges));
    if stats.dropped_duplicates > 0 {
        output.push_str(&format!(
            "Duplicate Ids:       {}\n",
            stats.dropped_duplicates
        ));
    }
    match stats.average_resonance {
        Some(avg) => output.push_str(&format!("Average Resonance:   {:.1}%\n\n", avg * 100.0)),
        None => output.push_str("Average Resonance:   n/a\n\n"),
    }

    if !stats.nodes_by_tier.is_empty() {
        output.push_str("Nodes by Tier:\n");
        let mut sorted: Vec<_> = stats.nodes_by_tier.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        for (tier, count) in sorted {
            output.push_str(&format!("  {:20} {}\n", tier.as_str(), count));
        }
        output.push('\n');
    }

    if !stats.edges_by_type.is_empty() {
        output.push_str("Edges by Type:\n");
        let mut sorted: Vec<_> = stats.edges_by_type.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        for (edge_type, count) in sorted {
            output.push_str(&format!("  {:20} {}\n", edge_type, count));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, GraphNode};

    fn model() -> GraphModel {
        GraphModel::new(
            vec![
                GraphNode::new("a", "Alpha", Tier::Regular).with_resonance(0.5),
                GraphNode::new("b", "Beta", Tier::Regular).with_resonance(1.0),
                GraphNode::new("c", "Gamma", Tier::Hyper),
                GraphNode::untiered("d", "Delta"),
                GraphNode::new("a", "Alpha again", Tier::Mega),
            ],
            vec![
                GraphEdge::new("a", "b").with_type("supports"),
                GraphEdge::new("b", "ghost").with_type("supports"),
                GraphEdge::new("a", "c").with_type("cites"),
            ],
        )
    }

    #[test]
    fn test_compute() {
        let stats = GraphStatistics::compute(&model());
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.nodes_by_tier.get(&Tier::Regular), Some(&2));
        assert_eq!(stats.nodes_by_tier.get(&Tier::Mega), None);
        assert_eq!(stats.untiered_nodes, 1);
        assert_eq!(stats.dangling_edges, 1);
        assert_eq!(stats.isolated_nodes, 1);
        assert_eq!(stats.edges_by_type.get("supports"), Some(&2));
        assert_eq!(stats.dropped_duplicates, 1);
        assert_eq!(stats.average_resonance, Some(0.75));
    }

    #[test]
    fn test_empty_model() {
        let stats = GraphStatistics::compute(&GraphModel::empty());
        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.average_resonance, None);
        assert!(format_stats(&stats).contains("n/a"));
    }

    #[test]
    fn test_format_stats() {
        let output = format_stats(&GraphStatistics::compute(&model()));
        assert!(output.contains("Total Nodes:"));
        assert!(output.contains("75.0%"));
        assert!(output.contains("Nodes by Tier:"));
        assert!(output.contains("supports"));
        assert!(output.contains("Duplicate Ids:       1"));
    }
}
