//! Render adapter contract
//!
//! The controller never draws. It hands the adapter relayout requests and
//! finished [`RenderFrame`] values; the adapter owns layout computation and
//! everything visual.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::{
    Emphasis, HighlightSet, LayoutKind, LayoutParams, NodeVisual, SearchMatches, VisibleSubset,
};

use super::generation::Generation;

/// A node position in layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Node positions produced by one relayout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPositions {
    pub kind: LayoutKind,
    positions: HashMap<String, Position>,
}

impl LayoutPositions {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            positions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, position: Position) {
        self.positions.insert(id.into(), position);
    }

    pub fn get(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> + '_ {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }
}

impl FromIterator<(String, Position)> for LayoutPositions {
    fn from_iter<I: IntoIterator<Item = (String, Position)>>(iter: I) -> Self {
        Self {
            kind: LayoutKind::default(),
            positions: iter.into_iter().collect(),
        }
    }
}

/// Adapter-side failures
///
/// These never break interaction. The controller logs them, reports them as
/// events, and keeps the previous positions on screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Render adapter failed: {0}")]
    AdapterFailed(String),

    #[error("Relayout {generation} timed out after {timeout_ms}ms")]
    TimedOut {
        generation: Generation,
        timeout_ms: u64,
    },
}

/// Everything an adapter needs to compute a layout
#[derive(Debug, Clone)]
pub struct RelayoutRequest {
    pub generation: Generation,
    pub visible: Arc<VisibleSubset>,
    pub params: LayoutParams,
    pub node_visuals: Arc<Vec<NodeVisual>>,
}

/// What an adapter reports when handed a relayout request
#[derive(Debug, Clone, PartialEq)]
pub enum RelayoutStatus {
    /// Finished synchronously
    Completed(LayoutPositions),
    /// Still running; the result arrives later through
    /// `GraphViewController::complete_relayout`
    Pending,
    Failed(RenderError),
}

/// The selected id and where it currently resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedNode {
    pub id: String,
    /// Present in the loaded model
    pub in_model: bool,
    /// Present in the visible subset
    pub visible: bool,
}

/// One complete, self-contained description of what should be on screen
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// Increases with every frame handed to the adapter
    pub sequence: u64,
    pub visible: Arc<VisibleSubset>,
    pub highlight: HighlightSet,
    pub search: SearchMatches,
    pub selection: Option<SelectedNode>,
    pub layout: LayoutParams,
    pub node_visuals: Arc<Vec<NodeVisual>>,
    /// Last successfully applied positions, possibly from an older subset
    pub positions: Option<Arc<LayoutPositions>>,
    pub layout_generation: Option<Generation>,
    pub labels_visible: bool,
    pub controls_visible: bool,
    /// Generation of a relayout still in flight
    pub relayout_pending: Option<Generation>,
}

impl RenderFrame {
    /// An empty frame for the given layout
    pub fn empty(layout: LayoutParams) -> Self {
        Self {
            sequence: 0,
            visible: Arc::new(VisibleSubset::default()),
            highlight: HighlightSet::neutral(),
            search: SearchMatches::default(),
            selection: None,
            layout,
            node_visuals: Arc::new(Vec::new()),
            positions: None,
            layout_generation: None,
            labels_visible: true,
            controls_visible: true,
            relayout_pending: None,
        }
    }

    pub fn emphasis(&self, id: &str) -> Emphasis {
        self.highlight.emphasis(id)
    }

    pub fn visual(&self, id: &str) -> Option<&NodeVisual> {
        self.node_visuals.iter().find(|v| v.id == id)
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.as_ref().and_then(|p| p.get(id))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.as_ref().is_some_and(|s| s.id == id)
    }

    pub fn is_search_match(&self, id: &str) -> bool {
        self.search.contains(id)
    }
}

/// Boundary between the view engine and a concrete renderer
pub trait RenderAdapter {
    /// Start computing positions for `request`
    fn relayout(&mut self, request: &RelayoutRequest) -> RelayoutStatus;

    /// Present a frame
    fn render(&mut self, frame: &RenderFrame);
}
