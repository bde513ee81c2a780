//! Terminal render adapter

use dtugraph_core::render::{
    RelayoutRequest, RelayoutStatus, RenderAdapter, RenderError, RenderFrame,
};
use tracing::debug;

use crate::placement;

/// Computes layouts synchronously and keeps the latest frame for drawing
#[derive(Debug, Default)]
pub struct TerminalAdapter {
    frame: Option<RenderFrame>,
}

impl TerminalAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame to draw, once the controller has presented one
    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }
}

impl RenderAdapter for TerminalAdapter {
    fn relayout(&mut self, request: &RelayoutRequest) -> RelayoutStatus {
        let positions = placement::place(request);
        if positions.iter().any(|(_, p)| !p.x.is_finite() || !p.y.is_finite()) {
            return RelayoutStatus::Failed(RenderError::AdapterFailed(format!(
                "{} layout produced non-finite coordinates",
                request.params.kind
            )));
        }
        debug!(
            generation = %request.generation,
            layout = %request.params.kind,
            nodes = positions.len(),
            "Placed nodes"
        );
        RelayoutStatus::Completed(positions)
    }

    fn render(&mut self, frame: &RenderFrame) {
        self.frame = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtugraph_core::controller::GraphViewController;
    use dtugraph_core::graph::{GraphEdge, GraphNode, Tier};
    use dtugraph_core::view::{LayoutKind, ViewIntent};

    #[test]
    fn test_adapter_receives_positioned_frames() {
        let mut controller = GraphViewController::new(TerminalAdapter::new());
        controller.set_graph(
            vec![
                GraphNode::new("a", "Alpha", Tier::Regular),
                GraphNode::new("b", "Beta", Tier::Hyper),
            ],
            vec![GraphEdge::new("a", "b")],
        );
        controller.dispatch(ViewIntent::SetLayout(LayoutKind::Concentric));

        let frame = controller.adapter().frame().unwrap();
        assert_eq!(frame.sequence, controller.frame().sequence);
        let positions = frame.positions.as_ref().unwrap();
        assert_eq!(positions.kind, LayoutKind::Concentric);
        assert_eq!(positions.len(), 2);
        assert_eq!(frame.relayout_pending, None);
    }
}
