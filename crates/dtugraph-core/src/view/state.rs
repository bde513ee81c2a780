//! View state and the intents that mutate it

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::graph::Tier;

use super::layout::LayoutKind;
use super::selection::{SelectionController, SelectionSource};

/// Set of tiers currently visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierSet(BTreeSet<Tier>);

impl TierSet {
    /// All four tiers
    pub fn all() -> Self {
        Tier::all().iter().copied().collect()
    }

    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.0.contains(&tier)
    }

    /// Whether a node with this tier passes the filter
    ///
    /// Nodes without a tier never match.
    pub fn matches(&self, tier: Option<Tier>) -> bool {
        tier.is_some_and(|t| self.contains(t))
    }

    pub fn insert(&mut self, tier: Tier) -> bool {
        self.0.insert(tier)
    }

    pub fn remove(&mut self, tier: Tier) -> bool {
        self.0.remove(&tier)
    }

    /// Flip membership of `tier`; returns whether it is now included
    pub fn toggle(&mut self, tier: Tier) -> bool {
        if !self.0.remove(&tier) {
            self.0.insert(tier);
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_all(&self) -> bool {
        self.0.len() == Tier::all().len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tier> + '_ {
        self.0.iter().copied()
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Tier> for TierSet {
    fn from_iter<I: IntoIterator<Item = Tier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for TierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Tier::as_str).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Explicit user intents; the only way view state changes
#[derive(Debug, Clone, PartialEq)]
pub enum ViewIntent {
    ToggleTier(Tier),
    SetTiers(TierSet),
    ShowAllTiers,
    SetQuery(String),
    ClearQuery,
    SelectNode(String),
    ClearSelection,
    SetLayout(LayoutKind),
    SetLabelsVisible(bool),
    ToggleLabels,
    SetControlsVisible(bool),
}

/// Which parts of the view state an intent touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewChange {
    pub tiers: bool,
    pub query: bool,
    pub selection: bool,
    pub layout: bool,
    pub labels: bool,
    pub controls: bool,
}

impl ViewChange {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Tier and layout changes invalidate positions
    pub fn needs_relayout(&self) -> bool {
        self.tiers || self.layout
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            tiers: self.tiers || other.tiers,
            query: self.query || other.query,
            selection: self.selection || other.selection,
            layout: self.layout || other.layout,
            labels: self.labels || other.labels,
            controls: self.controls || other.controls,
        }
    }
}

/// View state owned by the controller
#[derive(Debug, Clone)]
pub struct ViewState {
    pub filter_tiers: TierSet,
    pub search_query: String,
    pub selection: SelectionController,
    pub layout_kind: LayoutKind,
    pub labels_visible: bool,
    pub controls_visible: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter_tiers: TierSet::all(),
            search_query: String::new(),
            selection: SelectionController::new(),
            layout_kind: LayoutKind::default(),
            labels_visible: true,
            controls_visible: true,
        }
    }
}

impl ViewState {
    /// Initial state seeded from configuration
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            filter_tiers: config.default_tiers.iter().copied().collect(),
            layout_kind: config.layout,
            labels_visible: config.labels_visible,
            controls_visible: config.controls_visible,
            ..Self::default()
        }
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    /// Apply one intent and report what changed
    pub fn apply(&mut self, intent: ViewIntent) -> ViewChange {
        let mut change = ViewChange::default();
        match intent {
            ViewIntent::ToggleTier(tier) => {
                self.filter_tiers.toggle(tier);
                change.tiers = true;
            }
            ViewIntent::SetTiers(tiers) => {
                change.tiers = self.filter_tiers != tiers;
                self.filter_tiers = tiers;
            }
            ViewIntent::ShowAllTiers => {
                change.tiers = !self.filter_tiers.is_all();
                self.filter_tiers = TierSet::all();
            }
            ViewIntent::SetQuery(query) => {
                change.query = self.search_query != query;
                self.search_query = query;
            }
            ViewIntent::ClearQuery => {
                change.query = !self.search_query.is_empty();
                self.search_query.clear();
            }
            ViewIntent::SelectNode(id) => {
                change.selection = self.selection.select(id);
            }
            ViewIntent::ClearSelection => {
                change.selection = self.selection.clear();
            }
            ViewIntent::SetLayout(kind) => {
                change.layout = self.layout_kind != kind;
                self.layout_kind = kind;
            }
            ViewIntent::SetLabelsVisible(visible) => {
                change.labels = self.labels_visible != visible;
                self.labels_visible = visible;
            }
            ViewIntent::ToggleLabels => {
                self.labels_visible = !self.labels_visible;
                change.labels = true;
            }
            ViewIntent::SetControlsVisible(visible) => {
                change.controls = self.controls_visible != visible;
                self.controls_visible = visible;
            }
        }
        change
    }
}

impl ViewIntent {
    /// Selection source recorded for intents that touch selection
    pub fn selection_source(&self) -> Option<SelectionSource> {
        matches!(self, Self::SelectNode(_) | Self::ClearSelection).then_some(SelectionSource::Intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ViewState::default();
        assert!(state.filter_tiers.is_all());
        assert!(state.search_query.is_empty());
        assert_eq!(state.selected_node_id(), None);
        assert_eq!(state.layout_kind, LayoutKind::Force);
        assert!(state.labels_visible);
    }

    #[test]
    fn test_tier_toggle_can_empty_the_set() {
        let mut state = ViewState::default();
        for tier in Tier::all() {
            let change = state.apply(ViewIntent::ToggleTier(*tier));
            assert!(change.needs_relayout());
        }
        assert!(state.filter_tiers.is_empty());

        state.apply(ViewIntent::ShowAllTiers);
        assert!(state.filter_tiers.is_all());
    }

    #[test]
    fn test_query_change_does_not_relayout() {
        let mut state = ViewState::default();
        let change = state.apply(ViewIntent::SetQuery("graph".into()));
        assert!(change.query);
        assert!(!change.needs_relayout());

        assert!(state.apply(ViewIntent::SetQuery("graph".into())).is_empty());
        assert!(state.apply(ViewIntent::ClearQuery).query);
        assert!(state.apply(ViewIntent::ClearQuery).is_empty());
    }

    #[test]
    fn test_same_layout_is_not_a_change() {
        let mut state = ViewState::default();
        assert!(state.apply(ViewIntent::SetLayout(LayoutKind::Force)).is_empty());
        assert!(state.apply(ViewIntent::SetLayout(LayoutKind::Grid)).layout);
    }

    #[test]
    fn test_selection_intents() {
        let mut state = ViewState::default();
        assert!(state.apply(ViewIntent::SelectNode("a".into())).selection);
        assert_eq!(state.selected_node_id(), Some("a"));
        assert!(state.apply(ViewIntent::ClearSelection).selection);
        assert_eq!(
            ViewIntent::ClearSelection.selection_source(),
            Some(SelectionSource::Intent)
        );
        assert_eq!(ViewIntent::ToggleLabels.selection_source(), None);
    }

    #[test]
    fn test_change_merge() {
        let a = ViewChange {
            query: true,
            ..Default::default()
        };
        let b = ViewChange {
            layout: true,
            ..Default::default()
        };
        let merged = a.merge(b);
        assert!(merged.query && merged.layout);
        assert!(merged.needs_relayout());
    }

    #[test]
    fn test_tier_set_display_and_serde() {
        let tiers: TierSet = [Tier::Shadow, Tier::Regular].into_iter().collect();
        assert_eq!(tiers.to_string(), "regular,shadow");
        assert_eq!(serde_json::to_string(&tiers).unwrap(), r#"["regular","shadow"]"#);
        assert!(!tiers.matches(None));
    }
}
