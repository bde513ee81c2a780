//! Selection state machine
//!
//! Two sources drive selection: an externally supplied id (prop-like input
//! that is re-sent every cycle) and local clicks. The external id is applied
//! only when it differs from the last value seen, so an unchanged external
//! value never overrides a more recent click.

use serde::{Deserialize, Serialize};

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(String),
}

impl SelectionState {
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Self::Selected(id) => Some(id),
            Self::Unselected => None,
        }
    }
}

/// What caused a selection change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    /// Externally supplied id
    External,
    /// Click on a node or the background
    Click,
    /// Explicit view intent
    Intent,
}

/// Reconciles external and local selection; holds at most one id
///
/// Ids are not validated against the graph. Selecting an id that is not
/// loaded yet is accepted and simply renders nothing until it appears.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
    last_external: Option<String>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.state.selected_id()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id() == Some(id)
    }

    /// Select `id`; returns whether the state changed
    pub fn select(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.is_selected(&id) {
            return false;
        }
        self.state = SelectionState::Selected(id);
        true
    }

    /// Clear the selection; returns whether the state changed
    pub fn clear(&mut self) -> bool {
        if self.state == SelectionState::Unselected {
            return false;
        }
        self.state = SelectionState::Unselected;
        true
    }

    /// Feed the externally supplied id for this cycle
    ///
    /// Only a change relative to the previous external value takes effect:
    /// `Some(id)` selects it, `None` clears. Returns whether the state changed.
    pub fn sync_external(&mut self, external: Option<&str>) -> bool {
        if self.last_external.as_deref() == external {
            return false;
        }
        self.last_external = external.map(str::to_string);
        match external {
            Some(id) => self.select(id),
            None => self.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_idempotent() {
        let mut selection = SelectionController::new();
        assert!(selection.select("a"));
        assert!(!selection.select("a"));
        assert_eq!(selection.state(), &SelectionState::Selected("a".into()));
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut selection = SelectionController::new();
        selection.select("a");
        assert!(selection.select("b"));
        assert_eq!(selection.selected_id(), Some("b"));
        assert!(!selection.is_selected("a"));
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionController::new();
        assert!(!selection.clear());
        selection.select("a");
        assert!(selection.clear());
        assert_eq!(selection.state(), &SelectionState::Unselected);
    }

    #[test]
    fn test_unknown_id_is_accepted() {
        let mut selection = SelectionController::new();
        selection.select("not-loaded-yet");
        assert_eq!(
            selection.state(),
            &SelectionState::Selected("not-loaded-yet".into())
        );
    }

    #[test]
    fn test_external_change_reenters_selected() {
        let mut selection = SelectionController::new();
        assert!(selection.sync_external(Some("a")));
        selection.clear();
        assert!(selection.sync_external(Some("b")));
        assert_eq!(selection.selected_id(), Some("b"));
    }

    #[test]
    fn test_unchanged_external_does_not_override_click() {
        let mut selection = SelectionController::new();
        selection.sync_external(Some("a"));
        selection.select("clicked");

        assert!(!selection.sync_external(Some("a")));
        assert_eq!(selection.selected_id(), Some("clicked"));
    }

    #[test]
    fn test_external_none_clears() {
        let mut selection = SelectionController::new();
        selection.sync_external(Some("a"));
        assert!(selection.sync_external(None));
        assert_eq!(selection.selected_id(), None);
        assert!(!selection.sync_external(None));
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&SelectionState::Selected("x".into())).unwrap();
        assert_eq!(json, r#"{"state":"selected","id":"x"}"#);
    }
}
