//! Neighborhood highlight
//!
//! Given a focus node, marks the node and its direct neighbors as focused
//! and every other visible node as faded. Depth is fixed at one hop.

use std::collections::BTreeSet;

use serde::Serialize;

use super::filter::VisibleSubset;

/// How a node should be emphasized by the hover layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Nothing is focused; draw normally
    Neutral,
    /// Focus node or one of its neighbors
    Focused,
    /// Visible but outside the focused neighborhood
    Faded,
}

/// Focused and faded node ids for one focus
///
/// Both sets are empty in the neutral state. When non-empty they partition
/// the visible node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSet {
    focus: Option<String>,
    focused_ids: BTreeSet<String>,
    faded_ids: BTreeSet<String>,
}

impl HighlightSet {
    /// The neutral highlight (no dimming)
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn is_neutral(&self) -> bool {
        self.focused_ids.is_empty()
    }

    /// The node the highlight was computed for
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn focused_ids(&self) -> &BTreeSet<String> {
        &self.focused_ids
    }

    pub fn faded_ids(&self) -> &BTreeSet<String> {
        &self.faded_ids
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused_ids.contains(id)
    }

    pub fn is_faded(&self, id: &str) -> bool {
        self.faded_ids.contains(id)
    }

    pub fn emphasis(&self, id: &str) -> Emphasis {
        if self.is_focused(id) {
            Emphasis::Focused
        } else if self.is_faded(id) {
            Emphasis::Faded
        } else {
            Emphasis::Neutral
        }
    }
}

/// Compute the depth-1 neighborhood highlight of `focus` within `visible`
///
/// A missing focus, or a focus that is not visible, yields the neutral set.
pub fn highlight(visible: &VisibleSubset, focus: Option<&str>) -> HighlightSet {
    let Some(focus) = focus.filter(|id| visible.contains(id)) else {
        return HighlightSet::neutral();
    };

    let mut focused_ids: BTreeSet<String> = visible
        .edges()
        .iter()
        .filter_map(|e| e.other_end(focus))
        .map(str::to_string)
        .collect();
    focused_ids.insert(focus.to_string());

    let faded_ids = visible
        .node_ids()
        .filter(|id| !focused_ids.contains(*id))
        .map(str::to_string)
        .collect();

    HighlightSet {
        focus: Some(focus.to_string()),
        focused_ids,
        faded_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, GraphModel, GraphNode, Tier};
    use crate::view::{TierSet, filter};
    use proptest::prelude::*;

    fn ids(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    fn scenario_visible() -> VisibleSubset {
        let model = GraphModel::new(
            vec![
                GraphNode::new("A", "Alpha", Tier::Regular),
                GraphNode::new("B", "Beta", Tier::Mega),
                GraphNode::new("C", "Gamma", Tier::Hyper),
                GraphNode::new("D", "Delta", Tier::Shadow),
            ],
            vec![GraphEdge::new("A", "B"), GraphEdge::new("B", "C")],
        );
        let tiers: TierSet = [Tier::Regular, Tier::Mega, Tier::Hyper].into_iter().collect();
        filter(&model, &tiers)
    }

    #[test]
    fn test_scenario_focus_on_hub() {
        let set = highlight(&scenario_visible(), Some("B"));
        assert_eq!(ids(set.focused_ids()), vec!["A", "B", "C"]);
        assert!(set.faded_ids().is_empty());
        assert_eq!(set.focus(), Some("B"));
    }

    #[test]
    fn test_scenario_focus_on_leaf() {
        let set = highlight(&scenario_visible(), Some("A"));
        assert_eq!(ids(set.focused_ids()), vec!["A", "B"]);
        assert_eq!(ids(set.faded_ids()), vec!["C"]);
        assert_eq!(set.emphasis("C"), Emphasis::Faded);
        assert_eq!(set.emphasis("A"), Emphasis::Focused);
    }

    #[test]
    fn test_neutral_when_no_focus() {
        let set = highlight(&scenario_visible(), None);
        assert!(set.is_neutral());
        assert!(set.faded_ids().is_empty());
        assert_eq!(set.emphasis("A"), Emphasis::Neutral);
    }

    #[test]
    fn test_neutral_when_focus_filtered_out() {
        let set = highlight(&scenario_visible(), Some("D"));
        assert!(set.is_neutral());
        assert_eq!(set.focus(), None);
    }

    #[test]
    fn test_isolated_focus() {
        let model = GraphModel::new(
            vec![
                GraphNode::new("x", "x", Tier::Regular),
                GraphNode::new("y", "y", Tier::Regular),
                GraphNode::new("z", "z", Tier::Regular),
            ],
            vec![GraphEdge::new("y", "z")],
        );
        let visible = filter(&model, &TierSet::all());
        let set = highlight(&visible, Some("x"));

        assert_eq!(ids(set.focused_ids()), vec!["x"]);
        assert_eq!(ids(set.faded_ids()), vec!["y", "z"]);
    }

    proptest! {
        #[test]
        fn prop_neighborhood_size(
            node_count in 1usize..20,
            pairs in prop::collection::vec((0usize..20, 0usize..20), 0..40),
            focus in 0usize..20,
        ) {
            let focus = focus % node_count;
            let nodes = (0..node_count)
                .map(|i| GraphNode::new(format!("n{i}"), format!("n{i}"), Tier::Regular))
                .collect();
            let edges = pairs
                .into_iter()
                .map(|(s, t)| (s % node_count, t % node_count))
                .filter(|(s, t)| s != t)
                .map(|(s, t)| GraphEdge::new(format!("n{s}"), format!("n{t}")))
                .collect();
            let model = GraphModel::new(nodes, edges);
            let visible = filter(&model, &TierSet::all());

            let focus_id = format!("n{focus}");
            let k = model.degree(&focus_id);
            let set = highlight(&visible, Some(&focus_id));

            prop_assert_eq!(set.focused_ids().len(), k + 1);
            for id in set.focused_ids() {
                prop_assert!(!set.is_faded(id));
            }
            prop_assert_eq!(set.focused_ids().len() + set.faded_ids().len(), visible.node_count());
        }
    }
}
