//! View pipeline
//!
//! ```text
//! GraphModel ──filter──> VisibleSubset ──┬─highlight─> HighlightSet
//!                                        ├─search────> SearchMatches
//!                                        └─layout────> LayoutParams + NodeVisual
//! ```
//!
//! Every function here is pure and total. The derived values are rebuilt
//! from scratch on each model or state change and never patched in place.

mod filter;
mod highlight;
mod layout;
mod search;
mod selection;
mod state;

pub use filter::{VisibleSubset, filter};
pub use highlight::{Emphasis, HighlightSet, highlight};
pub use layout::{
    AlgorithmParams, ConcentricMetric, HierarchyDirection, LayoutKind, LayoutParams, NodeVisual,
    TierStyle, node_visuals, resolve, tier_style,
};
pub use search::{SearchMatches, matches, search};
pub use selection::{SelectionController, SelectionSource, SelectionState};
pub use state::{TierSet, ViewChange, ViewIntent, ViewState};
