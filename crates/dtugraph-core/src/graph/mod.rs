//! Knowledge graph data model
//!
//! - **GraphNode**: a DTU with a tier, optional tags, resonance and timestamp
//! - **GraphEdge**: an undirected-for-viewing connection with weight and type
//! - **GraphModel**: the immutable snapshot of one session's nodes and edges

mod edge;
mod model;
mod node;

pub use edge::GraphEdge;
pub use model::{GraphData, GraphModel};
pub use node::{GraphNode, Tier};
