//! Graph node types
//!
//! A node is one Discrete Thought Unit (DTU) in the knowledge graph. Nodes
//! arrive already resolved from the caller; this module only fixes their
//! shape and the leniency rules applied when they are deserialized.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// A knowledge node as supplied by the caller
///
/// Unknown tier strings deserialize to `None`, which no tier filter ever
/// matches. Resonance is clamped into `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique identifier for the node
    pub id: String,
    /// Display text
    #[serde(default)]
    pub label: String,
    /// Importance classification; `None` when absent or unrecognized
    #[serde(
        default,
        deserialize_with = "deserialize_tier",
        skip_serializing_if = "Option::is_none"
    )]
    pub tier: Option<Tier>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Relevance/activity score (0.0 to 1.0)
    #[serde(
        default,
        deserialize_with = "deserialize_resonance",
        skip_serializing_if = "Option::is_none"
    )]
    pub resonance: Option<f32>,
    /// When the DTU was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl GraphNode {
    /// Create a new node with a known tier
    pub fn new(id: impl Into<String>, label: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tier: Some(tier),
            tags: BTreeSet::new(),
            resonance: None,
            created_at: None,
        }
    }

    /// Create a node without a tier
    pub fn untiered(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            tier: None,
            ..Self::new(id, label, Tier::Regular)
        }
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set resonance (clamped to 0.0-1.0)
    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.resonance = Some(clamp_resonance(resonance));
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

fn clamp_resonance(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn deserialize_tier<'de, D>(deserializer: D) -> Result<Option<Tier>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| Tier::parse(&s)))
}

fn deserialize_resonance<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f32> = Option::deserialize(deserializer)?;
    Ok(raw.map(clamp_resonance))
}

/// Knowledge-importance classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Ordinary DTU
    Regular,
    /// Consolidation of several regular DTUs
    Mega,
    /// Consolidation of mega DTUs
    Hyper,
    /// Background/derived DTU, normally hidden from primary views
    Shadow,
}

impl Tier {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Mega => "mega",
            Self::Hyper => "hyper",
            Self::Shadow => "shadow",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Some(Self::Regular),
            "mega" => Some(Self::Mega),
            "hyper" => Some(Self::Hyper),
            "shadow" => Some(Self::Shadow),
            _ => None,
        }
    }

    /// Get all tiers
    pub fn all() -> &'static [Tier] {
        &[Self::Regular, Self::Mega, Self::Hyper, Self::Shadow]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnknownTier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = GraphNode::new("dtu-1", "Ownership", Tier::Mega)
            .with_tags(["rust", "memory"])
            .with_resonance(0.8);

        assert_eq!(node.id, "dtu-1");
        assert_eq!(node.label, "Ownership");
        assert_eq!(node.tier, Some(Tier::Mega));
        assert!(node.tags.contains("rust"));
        assert_eq!(node.resonance, Some(0.8));
    }

    #[test]
    fn test_resonance_clamping() {
        assert_eq!(
            GraphNode::new("a", "a", Tier::Regular)
                .with_resonance(3.0)
                .resonance,
            Some(1.0)
        );
        assert_eq!(
            GraphNode::new("a", "a", Tier::Regular)
                .with_resonance(f32::NAN)
                .resonance,
            Some(0.0)
        );
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!(Tier::parse("mega"), Some(Tier::Mega));
        assert_eq!(Tier::parse(" HYPER "), Some(Tier::Hyper));
        assert_eq!(Tier::parse("ultra"), None);
        assert!("ultra".parse::<Tier>().is_err());
        assert_eq!("shadow".parse::<Tier>().unwrap(), Tier::Shadow);
    }

    #[test]
    fn test_deserialize_lenient_tier_and_resonance() {
        let json = r#"{"id":"n1","label":"Node","tier":"legendary","resonance":1.7,
                       "createdAt":"2024-05-01T10:00:00Z"}"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.tier, None);
        assert_eq!(node.resonance, Some(1.0));
        assert!(node.created_at.is_some());
        assert!(node.tags.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_node() {
        let node: GraphNode = serde_json::from_str(r#"{"id":"n2","tier":"Shadow"}"#).unwrap();
        assert_eq!(node.label, "");
        assert_eq!(node.tier, Some(Tier::Shadow));
        assert_eq!(node.resonance, None);
    }

    #[test]
    fn test_untiered_node_serializes_without_tier() {
        let json = serde_json::to_string(&GraphNode::untiered("x", "X")).unwrap();
        assert!(!json.contains("tier"));
        assert!(!json.contains("tags"));
    }
}
