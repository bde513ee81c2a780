//! Rendering boundary
//!
//! Provides the [`RenderAdapter`] trait, the frame and relayout types that
//! cross it, generation tracking for relayouts, and a headless
//! [`RecordingAdapter`].

mod adapter;
mod generation;
mod recording;

pub use adapter::{
    LayoutPositions, Position, RelayoutRequest, RelayoutStatus, RenderAdapter, RenderError,
    RenderFrame, SelectedNode,
};
pub use generation::{Admission, Generation, RelayoutTracker};
pub use recording::{RecordingAdapter, RecordingMode};
