//! Label search
//!
//! Case-insensitive substring match against node labels only. The matches
//! form their own highlight layer that persists while hover highlight comes
//! and goes; the two layers are never merged.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::graph::GraphNode;

use super::filter::VisibleSubset;

/// Check whether `node`'s label contains `query`, ignoring case
///
/// An empty query matches nothing.
pub fn matches(node: &GraphNode, query: &str) -> bool {
    LabelMatcher::new(query).is_match(node)
}

/// Lowercased needle reused across a whole subset
struct LabelMatcher {
    needle: Option<String>,
}

impl LabelMatcher {
    fn new(query: &str) -> Self {
        let needle = (!query.is_empty()).then(|| query.to_lowercase());
        Self { needle }
    }

    fn is_match(&self, node: &GraphNode) -> bool {
        match &self.needle {
            Some(needle) => node.label.to_lowercase().contains(needle.as_str()),
            None => false,
        }
    }
}

/// Ids of visible nodes matching the current query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchMatches {
    query: String,
    ids: BTreeSet<String>,
}

impl SearchMatches {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether a query is active (even one with zero matches)
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }
}

/// Match `query` against every visible node
pub fn search(visible: &VisibleSubset, query: &str) -> SearchMatches {
    let matcher = LabelMatcher::new(query);
    let ids = visible
        .nodes()
        .iter()
        .filter(|n| matcher.is_match(n))
        .map(|n| n.id.clone())
        .collect();

    SearchMatches {
        query: query.to_string(),
        ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphModel, Tier};
    use crate::view::{TierSet, filter};
    use proptest::prelude::*;

    #[test]
    fn test_case_insensitive_substring() {
        let node = GraphNode::new("n1", "Borrow Checker", Tier::Regular);
        assert!(matches(&node, "borrow"));
        assert!(matches(&node, "CHECK"));
        assert!(matches(&node, "w C"));
        assert!(!matches(&node, "lifetime"));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let node = GraphNode::new("n1", "Anything", Tier::Regular);
        assert!(!matches(&node, ""));
    }

    #[test]
    fn test_tags_and_ids_are_not_searched() {
        let node = GraphNode::new("rust-42", "Ownership", Tier::Regular).with_tags(["memory"]);
        assert!(!matches(&node, "memory"));
        assert!(!matches(&node, "rust-42"));
    }

    #[test]
    fn test_search_only_covers_visible_nodes() {
        let model = GraphModel::new(
            vec![
                GraphNode::new("a", "Graph theory", Tier::Regular),
                GraphNode::new("b", "Graph layout", Tier::Shadow),
                GraphNode::new("c", "Tokenizer", Tier::Mega),
            ],
            vec![],
        );
        let tiers: TierSet = [Tier::Regular, Tier::Mega].into_iter().collect();
        let visible = filter(&model, &tiers);

        let found = search(&visible, "graph");
        assert_eq!(found.ids().iter().collect::<Vec<_>>(), vec!["a"]);
        assert!(found.is_active());

        let none = search(&visible, "");
        assert!(none.is_empty());
        assert!(!none.is_active());
    }

    proptest! {
        #[test]
        fn prop_search_containment(
            labels in prop::collection::vec("[a-zA-Z ]{0,12}", 0..20),
            query in "[a-zA-Z]{0,3}",
        ) {
            let nodes = labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let tier = Tier::all()[i % 4];
                    GraphNode::new(format!("n{i}"), label.clone(), tier)
                })
                .collect();
            let model = GraphModel::new(nodes, vec![]);
            let tiers: TierSet = [Tier::Regular, Tier::Hyper].into_iter().collect();
            let visible = filter(&model, &tiers);
            let found = search(&visible, &query);

            for id in found.ids() {
                let node = visible.node(id);
                prop_assert!(node.is_some());
                prop_assert!(matches(node.unwrap(), &query));
            }
            if query.is_empty() {
                prop_assert!(found.is_empty());
            }
        }
    }
}
