//! Dtugraph Core Library
//!
//! This crate provides the view engine behind the knowledge-graph explorer:
//! - Graph model (immutable node/edge snapshots of Discrete Thought Units)
//! - View pipeline (tier filtering, neighborhood highlight, label search)
//! - Layout selection and tier-derived node styling
//! - Selection reconciliation between external and local input
//! - Render adapter contract with generation-tagged relayouts
//! - Controller tying the pipeline to interaction events
//! - Statistics and export snapshots
//!
//! Nothing in this crate draws pixels. A [`render::RenderAdapter`] receives
//! plain [`render::RenderFrame`] values and owns everything visual.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod export;
pub mod graph;
pub mod render;
pub mod stats;
pub mod view;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::controller::{GraphCallbacks, GraphViewController, InteractionEvent};
    pub use crate::error::{Error, Result};
    pub use crate::graph::{GraphEdge, GraphModel, GraphNode, Tier};
    pub use crate::render::{RenderAdapter, RenderFrame};
    pub use crate::view::{LayoutKind, TierSet, ViewIntent, ViewState};
}
