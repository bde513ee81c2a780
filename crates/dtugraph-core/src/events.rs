//! View events
//!
//! The controller records what happened during each cycle as events. They are
//! the side-channel through which relayout failures and other non-fatal
//! conditions reach telemetry, since none of them are returned as errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::render::Generation;
use crate::view::{LayoutKind, SelectionSource};

/// Events emitted by the graph view controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// The graph model was replaced wholesale
    ModelReplaced {
        node_count: usize,
        edge_count: usize,
        dropped_duplicates: usize,
        timestamp: DateTime<Utc>,
    },
    /// Derived view data was recomputed
    ViewRecomputed {
        visible_nodes: usize,
        visible_edges: usize,
        dropped_edges: usize,
        timestamp: DateTime<Utc>,
    },
    /// A relayout was handed to the render adapter
    RelayoutRequested {
        generation: Generation,
        layout: LayoutKind,
        timestamp: DateTime<Utc>,
    },
    /// Relayout positions were accepted
    RelayoutApplied {
        generation: Generation,
        positioned_nodes: usize,
        timestamp: DateTime<Utc>,
    },
    /// A relayout result arrived after a newer request was made
    RelayoutDiscarded {
        generation: Generation,
        latest: Generation,
        timestamp: DateTime<Utc>,
    },
    /// A relayout failed or timed out; the previous layout stays displayed
    RelayoutFailed {
        generation: Generation,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    /// Selection moved
    SelectionChanged {
        previous: Option<String>,
        current: Option<String>,
        source: SelectionSource,
        timestamp: DateTime<Utc>,
    },
    /// A node was double-clicked (open/drill-in intent)
    DrillIn {
        node_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl ViewEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ModelReplaced { timestamp, .. }
            | Self::ViewRecomputed { timestamp, .. }
            | Self::RelayoutRequested { timestamp, .. }
            | Self::RelayoutApplied { timestamp, .. }
            | Self::RelayoutDiscarded { timestamp, .. }
            | Self::RelayoutFailed { timestamp, .. }
            | Self::SelectionChanged { timestamp, .. }
            | Self::DrillIn { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type name
    pub fn event_type_name(&self) -> &'static str {
        match self {
            Self::ModelReplaced { .. } => "model_replaced",
            Self::ViewRecomputed { .. } => "view_recomputed",
            Self::RelayoutRequested { .. } => "relayout_requested",
            Self::RelayoutApplied { .. } => "relayout_applied",
            Self::RelayoutDiscarded { .. } => "relayout_discarded",
            Self::RelayoutFailed { .. } => "relayout_failed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::DrillIn { .. } => "drill_in",
        }
    }

    /// Whether the event reports a problem worth surfacing
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RelayoutFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tag() {
        let event = ViewEvent::DrillIn {
            node_id: "dtu-1".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "drill_in");
        assert_eq!(json["node_id"], "dtu-1");
        assert_eq!(event.event_type_name(), "drill_in");
    }

    #[test]
    fn test_failure_classification() {
        let now = Utc::now();
        let failed = ViewEvent::RelayoutFailed {
            generation: Generation::new(3),
            reason: "adapter crashed".into(),
            timestamp: now,
        };
        assert!(failed.is_failure());
        assert_eq!(failed.timestamp(), now);

        let applied = ViewEvent::RelayoutApplied {
            generation: Generation::new(3),
            positioned_nodes: 4,
            timestamp: now,
        };
        assert!(!applied.is_failure());
    }

    #[test]
    fn test_event_roundtrip_keeps_generation() {
        let event = ViewEvent::RelayoutDiscarded {
            generation: Generation::new(1),
            latest: Generation::new(2),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ViewEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
