//! Export snapshots
//!
//! A self-contained, serializable description of what is on screen, handed
//! to whatever produces image exports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::graph::{GraphEdge, Tier};
use crate::render::{Generation, Position, RenderFrame};
use crate::view::{Emphasis, LayoutParams};

/// One visible node with its resolved visuals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub label: String,
    pub tier: Option<Tier>,
    pub size: f32,
    pub color: String,
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub emphasis: Emphasis,
    pub search_match: bool,
    pub selected: bool,
}

/// Serializable view of the current frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSnapshot {
    pub generated_at: DateTime<Utc>,
    pub layout: LayoutParams,
    /// Generation whose positions are included
    pub layout_generation: Option<Generation>,
    pub labels_visible: bool,
    pub query: String,
    pub selected: Option<String>,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<GraphEdge>,
}

impl ExportSnapshot {
    /// Build a snapshot from a frame
    pub fn from_frame(frame: &RenderFrame) -> Self {
        let nodes = frame
            .visible
            .nodes()
            .iter()
            .zip(frame.node_visuals.iter())
            .map(|(node, visual)| ExportNode {
                id: node.id.clone(),
                label: node.label.clone(),
                tier: node.tier,
                size: visual.size,
                color: visual.color.to_string(),
                opacity: visual.opacity,
                position: frame.position(&node.id),
                emphasis: frame.emphasis(&node.id),
                search_match: frame.is_search_match(&node.id),
                selected: frame.is_selected(&node.id),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            layout: frame.layout.clone(),
            layout_generation: frame.layout_generation,
            labels_visible: frame.labels_visible,
            query: frame.search.query().to_string(),
            selected: frame.selection.as_ref().map(|s| s.id.clone()),
            nodes,
            edges: frame.visible.edges().to_vec(),
        }
    }

    /// Number of nodes that carry a position
    pub fn positioned_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.position.is_some()).count()
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
