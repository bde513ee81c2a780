//! Graph view controller
//!
//! Ties the pure view pipeline to a [`RenderAdapter`]. The controller owns
//! the model snapshot and the view state, turns intents and pointer
//! interactions into state changes, recomputes derived data once per change
//! batch, and tracks relayout generations so only the newest layout result
//! is ever applied.
//!
//! Nothing here returns an error once a model is loaded. Relayout failures
//! and timeouts are logged, reported through [`ViewEvent`]s, and leave the
//! last good positions on screen.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::events::ViewEvent;
use crate::export::ExportSnapshot;
use crate::graph::{GraphEdge, GraphModel, GraphNode};
use crate::render::{
    Admission, Generation, LayoutPositions, RelayoutRequest, RelayoutStatus, RelayoutTracker,
    RenderAdapter, RenderError, RenderFrame, SelectedNode,
};
use crate::view::{
    SelectionSource, ViewChange, ViewIntent, ViewState, filter, highlight, node_visuals, resolve,
    search,
};

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

type NodeCallback = Box<dyn FnMut(&GraphNode)>;
type EdgeCallback = Box<dyn FnMut(&GraphEdge)>;

/// Outward callbacks fired by pointer interactions
#[derive(Default)]
pub struct GraphCallbacks {
    on_node_click: Option<NodeCallback>,
    on_node_double_click: Option<NodeCallback>,
    on_edge_click: Option<EdgeCallback>,
}

impl GraphCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_node_click(mut self, f: impl FnMut(&GraphNode) + 'static) -> Self {
        self.on_node_click = Some(Box::new(f));
        self
    }

    pub fn on_node_double_click(mut self, f: impl FnMut(&GraphNode) + 'static) -> Self {
        self.on_node_double_click = Some(Box::new(f));
        self
    }

    pub fn on_edge_click(mut self, f: impl FnMut(&GraphEdge) + 'static) -> Self {
        self.on_edge_click = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for GraphCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCallbacks")
            .field("on_node_click", &self.on_node_click.is_some())
            .field("on_node_double_click", &self.on_node_double_click.is_some())
            .field("on_edge_click", &self.on_edge_click.is_some())
            .finish()
    }
}

/// Pointer interactions reported by the render adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    NodeClick(String),
    NodeDoubleClick(String),
    EdgeClick { source: String, target: String },
    HoverStart(String),
    HoverEnd,
    BackgroundClick,
}

/// Owns the view engine state for one graph view
///
/// Events accumulate until [`take_events`](Self::take_events) drains them;
/// callers should drain once per cycle. At most [`MAX_PENDING_EVENTS`] are
/// kept and the oldest are dropped past that.
pub struct GraphViewController<A: RenderAdapter> {
    adapter: A,
    model: Arc<GraphModel>,
    state: ViewState,
    hover: Option<String>,
    tracker: RelayoutTracker,
    positions: Option<Arc<LayoutPositions>>,
    relayout_timeout: Duration,
    callbacks: GraphCallbacks,
    events: Vec<ViewEvent>,
    frame: RenderFrame,
}

impl<A: RenderAdapter> GraphViewController<A> {
    /// Create a controller with default configuration
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, &Config::default())
    }

    /// Create a controller whose initial view state comes from `config`
    pub fn with_config(adapter: A, config: &Config) -> Self {
        let state = ViewState::from_config(&config.view);
        let frame = RenderFrame::empty(resolve(state.layout_kind));
        let mut controller = Self {
            adapter,
            model: Arc::new(GraphModel::empty()),
            state,
            hover: None,
            tracker: RelayoutTracker::new(),
            positions: None,
            relayout_timeout: Duration::from_millis(config.relayout.timeout_ms),
            callbacks: GraphCallbacks::default(),
            events: Vec::new(),
            frame,
        };
        controller.recompute(false);
        controller
    }

    pub fn with_callbacks(mut self, callbacks: GraphCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: GraphCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn hover(&self) -> Option<&str> {
        self.hover.as_deref()
    }

    /// Generation of the relayout still running, if any
    pub fn relayout_in_flight(&self) -> Option<Generation> {
        self.tracker.in_flight()
    }

    /// The frame most recently handed to the adapter
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Replace the graph with new node and edge lists
    pub fn set_graph(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.set_model(GraphModel::new(nodes, edges));
    }

    /// Replace the graph model wholesale; always relayouts
    pub fn set_model(&mut self, model: impl Into<Arc<GraphModel>>) {
        self.model = model.into();
        info!(
            nodes = self.model.node_count(),
            edges = self.model.edge_count(),
            "Graph model replaced"
        );
        self.emit(ViewEvent::ModelReplaced {
            node_count: self.model.node_count(),
            edge_count: self.model.edge_count(),
            dropped_duplicates: self.model.dropped_duplicates(),
            timestamp: Utc::now(),
        });

        if self.hover.as_deref().is_some_and(|id| !self.model.contains(id)) {
            self.hover = None;
        }
        self.recompute(true);
    }

    /// Apply one intent
    pub fn dispatch(&mut self, intent: ViewIntent) -> ViewChange {
        self.dispatch_batch([intent])
    }

    /// Apply several intents as one gesture, recomputing once at the end
    pub fn dispatch_batch(&mut self, intents: impl IntoIterator<Item = ViewIntent>) -> ViewChange {
        let mut change = ViewChange::default();
        for intent in intents {
            let previous = self.state.selected_node_id().map(str::to_string);
            let source = intent.selection_source();
            let applied = self.state.apply(intent);
            if applied.selection {
                self.selection_changed(previous, source.unwrap_or(SelectionSource::Intent));
            }
            change = change.merge(applied);
        }

        if change.is_empty() {
            debug!("Intent batch changed nothing");
        } else {
            self.recompute(change.needs_relayout());
        }
        change
    }

    /// Feed the externally supplied selected node id
    ///
    /// Call this every cycle with the current external value. Only a change
    /// from the previous external value moves the selection.
    pub fn sync_selected_node_id(&mut self, external: Option<&str>) -> bool {
        let previous = self.state.selected_node_id().map(str::to_string);
        let changed = self.state.selection.sync_external(external);
        if changed {
            self.selection_changed(previous, SelectionSource::External);
            self.refresh_overlays();
            self.present();
        }
        changed
    }

    /// Handle a pointer interaction from the adapter
    pub fn handle_interaction(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::NodeClick(id) => self.node_click(&id),
            InteractionEvent::NodeDoubleClick(id) => self.node_double_click(&id),
            InteractionEvent::EdgeClick { source, target } => self.edge_click(&source, &target),
            InteractionEvent::HoverStart(id) => self.set_hover(Some(id)),
            InteractionEvent::HoverEnd => self.set_hover(None),
            InteractionEvent::BackgroundClick => {
                let previous = self.state.selected_node_id().map(str::to_string);
                if self.state.selection.clear() {
                    self.selection_changed(previous, SelectionSource::Click);
                    self.refresh_overlays();
                    self.present();
                }
            }
        }
    }

    /// Deliver the result of a relayout that reported `Pending`
    pub fn complete_relayout(
        &mut self,
        generation: Generation,
        result: Result<LayoutPositions, RenderError>,
    ) -> Admission {
        let admission = self.settle(generation, result);
        if admission == Admission::Current {
            self.present();
        }
        admission
    }

    /// Time out the in-flight relayout if it has exceeded the configured limit
    pub fn check_relayout_deadline(&mut self, now: Instant) -> Option<Generation> {
        let generation = self.tracker.expire(now, self.relayout_timeout)?;
        let err = RenderError::TimedOut {
            generation,
            timeout_ms: self.relayout_timeout.as_millis() as u64,
        };
        self.relayout_failed(generation, &err);
        self.present();
        Some(generation)
    }

    /// Serializable snapshot of the current view for image export
    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot::from_frame(&self.frame)
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Drain accumulated events
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    fn node_click(&mut self, id: &str) {
        let visible = Arc::clone(&self.frame.visible);
        let Some(node) = visible.node(id) else {
            debug!(node_id = id, "Ignoring click on node that is not visible");
            return;
        };

        let previous = self.state.selected_node_id().map(str::to_string);
        if self.state.selection.select(id) {
            self.selection_changed(previous, SelectionSource::Click);
            self.refresh_overlays();
            self.present();
        }
        if let Some(callback) = self.callbacks.on_node_click.as_mut() {
            callback(node);
        }
    }

    fn node_double_click(&mut self, id: &str) {
        let visible = Arc::clone(&self.frame.visible);
        let Some(node) = visible.node(id) else {
            debug!(node_id = id, "Ignoring double-click on node that is not visible");
            return;
        };

        info!(node_id = id, "Drill-in requested");
        self.emit(ViewEvent::DrillIn {
            node_id: id.to_string(),
            timestamp: Utc::now(),
        });
        if let Some(callback) = self.callbacks.on_node_double_click.as_mut() {
            callback(node);
        }
    }

    fn edge_click(&mut self, source: &str, target: &str) {
        let visible = Arc::clone(&self.frame.visible);
        let Some(edge) = visible.find_edge(source, target) else {
            debug!(source, target, "Ignoring click on edge that is not visible");
            return;
        };
        if let Some(callback) = self.callbacks.on_edge_click.as_mut() {
            callback(edge);
        }
    }

    fn set_hover(&mut self, hover: Option<String>) {
        if self.hover == hover {
            return;
        }
        self.hover = hover;
        self.frame.highlight = highlight(&self.frame.visible, self.hover.as_deref());
        self.present();
    }

    fn selection_changed(&mut self, previous: Option<String>, source: SelectionSource) {
        let current = self.state.selected_node_id().map(str::to_string);
        debug!(?previous, ?current, ?source, "Selection changed");
        self.emit(ViewEvent::SelectionChanged {
            previous,
            current,
            source,
            timestamp: Utc::now(),
        });
    }

    /// Rebuild every derived value from the model and view state
    fn recompute(&mut self, relayout: bool) {
        let visible = Arc::new(filter(&self.model, &self.state.filter_tiers));
        debug!(
            visible_nodes = visible.node_count(),
            visible_edges = visible.edge_count(),
            tiers = %self.state.filter_tiers,
            "Recomputed visible subset"
        );
        self.emit(ViewEvent::ViewRecomputed {
            visible_nodes: visible.node_count(),
            visible_edges: visible.edge_count(),
            dropped_edges: visible.dropped_edges(),
            timestamp: Utc::now(),
        });

        self.frame.node_visuals = Arc::new(node_visuals(&visible));
        self.frame.visible = visible;
        self.frame.layout = resolve(self.state.layout_kind);
        self.frame.labels_visible = self.state.labels_visible;
        self.frame.controls_visible = self.state.controls_visible;
        self.refresh_overlays();

        if relayout {
            self.request_relayout();
        }
        self.present();
    }

    /// Recompute the layers that depend on hover, query, and selection
    fn refresh_overlays(&mut self) {
        let visible = &self.frame.visible;
        self.frame.highlight = highlight(visible, self.hover.as_deref());
        self.frame.search = search(visible, &self.state.search_query);
        self.frame.selection = self.state.selected_node_id().map(|id| SelectedNode {
            id: id.to_string(),
            in_model: self.model.contains(id),
            visible: visible.contains(id),
        });
    }

    fn request_relayout(&mut self) {
        if let Some(superseded) = self.tracker.in_flight() {
            debug!(generation = %superseded, "Superseding in-flight relayout");
        }
        let generation = self.tracker.begin(Instant::now());
        let request = RelayoutRequest {
            generation,
            visible: Arc::clone(&self.frame.visible),
            params: self.frame.layout.clone(),
            node_visuals: Arc::clone(&self.frame.node_visuals),
        };

        info!(
            generation = %generation,
            layout = %request.params.kind,
            nodes = request.visible.node_count(),
            "Requesting relayout"
        );
        self.emit(ViewEvent::RelayoutRequested {
            generation,
            layout: request.params.kind,
            timestamp: Utc::now(),
        });

        match self.adapter.relayout(&request) {
            RelayoutStatus::Completed(positions) => {
                self.settle(generation, Ok(positions));
            }
            RelayoutStatus::Pending => {}
            RelayoutStatus::Failed(err) => {
                self.settle(generation, Err(err));
            }
        }
    }

    /// Apply or discard a relayout result without presenting
    fn settle(
        &mut self,
        generation: Generation,
        result: Result<LayoutPositions, RenderError>,
    ) -> Admission {
        let admission = self.tracker.admit(generation);
        match admission {
            Admission::Current => match result {
                Ok(positions) => {
                    info!(
                        generation = %generation,
                        positioned = positions.len(),
                        "Relayout applied"
                    );
                    self.emit(ViewEvent::RelayoutApplied {
                        generation,
                        positioned_nodes: positions.len(),
                        timestamp: Utc::now(),
                    });
                    self.tracker.mark_applied(generation);
                    self.positions = Some(Arc::new(positions));
                }
                Err(err) => self.relayout_failed(generation, &err),
            },
            Admission::Stale { latest } => {
                warn!(generation = %generation, latest = %latest, "Discarding stale relayout result");
                self.emit(ViewEvent::RelayoutDiscarded {
                    generation,
                    latest,
                    timestamp: Utc::now(),
                });
            }
            Admission::Settled => {
                warn!(generation = %generation, "Discarding relayout result that already settled");
                self.emit(ViewEvent::RelayoutDiscarded {
                    generation,
                    latest: self.tracker.latest(),
                    timestamp: Utc::now(),
                });
            }
        }
        admission
    }

    fn relayout_failed(&mut self, generation: Generation, err: &RenderError) {
        warn!(
            generation = %generation,
            error = %err,
            "Relayout failed; keeping previous layout"
        );
        self.emit(ViewEvent::RelayoutFailed {
            generation,
            reason: err.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Hand the current frame to the adapter
    fn present(&mut self) {
        self.frame.sequence += 1;
        self.frame.positions = self.positions.clone();
        self.frame.layout_generation = self.tracker.applied();
        self.frame.relayout_pending = self.tracker.in_flight();
        self.adapter.render(&self.frame);
    }

    fn emit(&mut self, event: ViewEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let excess = self.events.len() + 1 - MAX_PENDING_EVENTS;
            debug!(dropped = excess, "Event buffer full; dropping oldest events");
            self.events.drain(..excess);
        }
        self.events.push(event);
    }
}

impl<A: RenderAdapter + std::fmt::Debug> std::fmt::Debug for GraphViewController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphViewController")
            .field("adapter", &self.adapter)
            .field("nodes", &self.model.node_count())
            .field("state", &self.state)
            .field("hover", &self.hover)
            .field("tracker", &self.tracker)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
