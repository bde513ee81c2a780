//! Layout selection and tier styling
//!
//! Each [`LayoutKind`] resolves to one canonical [`LayoutParams`] bundle that
//! the render adapter hands to whatever layout engine it wraps. Node size
//! and color come from a declarative tier table and travel with the params
//! as data.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::graph::Tier;

use super::filter::VisibleSubset;

/// Discrete choice of graph-drawing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Force-directed
    #[default]
    Force,
    /// Nodes on a ring
    Circle,
    /// Rows and columns
    Grid,
    /// Layered breadth-first levels
    Hierarchy,
    /// Rings by tier importance
    Concentric,
}

impl LayoutKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Circle => "circle",
            Self::Grid => "grid",
            Self::Hierarchy => "hierarchy",
            Self::Concentric => "concentric",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "force" | "cose" => Some(Self::Force),
            "circle" => Some(Self::Circle),
            "grid" => Some(Self::Grid),
            "hierarchy" | "breadthfirst" => Some(Self::Hierarchy),
            "concentric" => Some(Self::Concentric),
            _ => None,
        }
    }

    /// Parse from string, falling back to the default layout
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            warn!(layout = s, "Unknown layout kind, using default");
            Self::default()
        })
    }

    /// Get all layout kinds
    pub fn all() -> &'static [LayoutKind] {
        &[
            Self::Force,
            Self::Circle,
            Self::Grid,
            Self::Hierarchy,
            Self::Concentric,
        ]
    }

    /// The kind after this one, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|k| k == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnknownLayout(s.to_string()))
    }
}

/// Direction of hierarchy levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyDirection {
    TopDown,
    LeftRight,
}

/// Value that decides a node's ring in the concentric layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentricMetric {
    /// Rank on the tier size ladder (hyper innermost)
    TierRank,
}

/// Algorithm-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum AlgorithmParams {
    Force {
        node_repulsion: f32,
        ideal_edge_length: f32,
        edge_elasticity: f32,
        gravity: f32,
        iterations: u32,
        /// Seed for the initial placement so relayouts are reproducible
        seed: u64,
    },
    Circle {
        start_angle: f32,
        clockwise: bool,
    },
    Grid {
        avoid_overlap: bool,
        condense: bool,
    },
    Hierarchy {
        direction: HierarchyDirection,
        level_separation: f32,
        node_separation: f32,
    },
    Concentric {
        metric: ConcentricMetric,
        min_node_spacing: f32,
        levels: u8,
    },
}

/// Parameter bundle consumed by the render adapter's layout engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub kind: LayoutKind,
    pub animate: bool,
    pub animation_duration_ms: u32,
    /// Fit the viewport to the laid-out nodes
    pub fit: bool,
    pub padding: u32,
    pub algorithm: AlgorithmParams,
}

/// Resolve the canonical parameter bundle for a layout kind
pub fn resolve(kind: LayoutKind) -> LayoutParams {
    let algorithm = match kind {
        LayoutKind::Force => AlgorithmParams::Force {
            node_repulsion: 400_000.0,
            ideal_edge_length: 100.0,
            edge_elasticity: 100.0,
            gravity: 80.0,
            iterations: 1000,
            seed: 42,
        },
        LayoutKind::Circle => AlgorithmParams::Circle {
            start_angle: -std::f32::consts::FRAC_PI_2,
            clockwise: true,
        },
        LayoutKind::Grid => AlgorithmParams::Grid {
            avoid_overlap: true,
            condense: false,
        },
        LayoutKind::Hierarchy => AlgorithmParams::Hierarchy {
            direction: HierarchyDirection::TopDown,
            level_separation: 80.0,
            node_separation: 40.0,
        },
        LayoutKind::Concentric => AlgorithmParams::Concentric {
            metric: ConcentricMetric::TierRank,
            min_node_spacing: 30.0,
            levels: 3,
        },
    };

    LayoutParams {
        kind,
        animate: !matches!(kind, LayoutKind::Grid),
        animation_duration_ms: 500,
        fit: true,
        padding: 30,
        algorithm,
    }
}

/// Visual policy for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierStyle {
    /// Node diameter in layout units
    pub size: f32,
    /// Position on the size ladder (0 = smallest)
    pub rank: u8,
    pub color: &'static str,
    pub opacity: f32,
}

static TIER_STYLES: [(Tier, TierStyle); 4] = [
    (
        Tier::Hyper,
        TierStyle {
            size: 56.0,
            rank: 2,
            color: "#f59e0b",
            opacity: 1.0,
        },
    ),
    (
        Tier::Mega,
        TierStyle {
            size: 40.0,
            rank: 1,
            color: "#a855f7",
            opacity: 1.0,
        },
    ),
    (
        Tier::Regular,
        TierStyle {
            size: 28.0,
            rank: 0,
            color: "#4f9dde",
            opacity: 1.0,
        },
    ),
    (
        Tier::Shadow,
        TierStyle {
            size: 28.0,
            rank: 0,
            color: "#64748b",
            opacity: 0.55,
        },
    ),
];

static UNTIERED_STYLE: TierStyle = TierStyle {
    size: 28.0,
    rank: 0,
    color: "#9ca3af",
    opacity: 1.0,
};

/// Look up the style for a tier; nodes without a tier get the neutral style
pub fn tier_style(tier: Option<Tier>) -> &'static TierStyle {
    tier.and_then(|t| TIER_STYLES.iter().find(|(candidate, _)| *candidate == t))
        .map(|(_, style)| style)
        .unwrap_or(&UNTIERED_STYLE)
}

/// Per-node visual data delivered to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeVisual {
    pub id: String,
    pub size: f32,
    pub rank: u8,
    pub color: &'static str,
    pub opacity: f32,
}

/// Compute visuals for every visible node, in subset order
pub fn node_visuals(visible: &VisibleSubset) -> Vec<NodeVisual> {
    visible
        .nodes()
        .iter()
        .map(|node| {
            let style = tier_style(node.tier);
            NodeVisual {
                id: node.id.clone(),
                size: style.size,
                rank: style.rank,
                color: style.color,
                opacity: style.opacity,
            }
        })
        .collect()
}
