//! Headless render adapter
//!
//! Records every request and frame instead of drawing. Used by the CLI to
//! run the controller without a display, and by tests to observe exactly
//! what the controller hands to a renderer.

use super::adapter::{
    LayoutPositions, Position, RelayoutRequest, RelayoutStatus, RenderAdapter, RenderError,
    RenderFrame,
};

/// How the recording adapter answers relayout requests
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordingMode {
    /// Complete every relayout immediately
    #[default]
    Immediate,
    /// Leave relayouts pending until completed from outside
    Deferred,
    /// Fail every relayout with the given message
    Failing(String),
}

/// Adapter that keeps what it receives
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    mode: RecordingMode,
    requests: Vec<RelayoutRequest>,
    frames: Vec<RenderFrame>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: RecordingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn set_mode(&mut self, mode: RecordingMode) {
        self.mode = mode;
    }

    pub fn requests(&self) -> &[RelayoutRequest] {
        &self.requests
    }

    pub fn frames(&self) -> &[RenderFrame] {
        &self.frames
    }

    pub fn last_request(&self) -> Option<&RelayoutRequest> {
        self.requests.last()
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }

    /// Positions this adapter would compute for `request`
    ///
    /// Nodes are placed left to right in subset order, spaced by the
    /// largest node size.
    pub fn placeholder_positions(request: &RelayoutRequest) -> LayoutPositions {
        let spacing = request
            .node_visuals
            .iter()
            .map(|v| v.size)
            .fold(0.0_f32, f32::max)
            + request.params.padding as f32;

        let mut positions = LayoutPositions::new(request.params.kind);
        for (i, id) in request.visible.node_ids().enumerate() {
            positions.insert(id, Position::new(i as f32 * spacing, 0.0));
        }
        positions
    }
}

impl RenderAdapter for RecordingAdapter {
    fn relayout(&mut self, request: &RelayoutRequest) -> RelayoutStatus {
        self.requests.push(request.clone());
        match &self.mode {
            RecordingMode::Immediate => {
                RelayoutStatus::Completed(Self::placeholder_positions(request))
            }
            RecordingMode::Deferred => RelayoutStatus::Pending,
            RecordingMode::Failing(message) => {
                RelayoutStatus::Failed(RenderError::AdapterFailed(message.clone()))
            }
        }
    }

    fn render(&mut self, frame: &RenderFrame) {
        self.frames.push(frame.clone());
    }
}
