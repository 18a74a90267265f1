//! Relationship graph types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Default strength for a new link when the caller gives none.
pub const DEFAULT_LINK_STRENGTH: f32 = 0.5;

/// Typed relationship between two items.
///
/// Serializes to lowercase for storage compatibility.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Related,
    Parent,
    Child,
    Sequential,
    Causal,
    Reference,
}

impl LinkType {
    /// Type of the mirrored edge: parent and child swap, everything else is symmetric.
    pub fn reverse(self) -> Self {
        match self {
            Self::Parent => Self::Child,
            Self::Child => Self::Parent,
            other => other,
        }
    }
}

/// Directed, typed, weighted edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipLink {
    pub from_id: String,
    pub to_id: String,
    pub link_type: LinkType,
    /// Link strength in [0, 1].
    pub strength: f32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl RelationshipLink {
    /// Create a link. Strength is clamped to [0, 1].
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        link_type: LinkType,
        strength: f32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            link_type,
            strength: clamp_strength(strength),
            created_at,
            metadata: None,
        }
    }

    /// Set metadata.
    pub fn with_metadata(mut self, metadata: Option<HashMap<String, serde_json::Value>>) -> Self {
        self.metadata = metadata;
        self
    }

    /// The mirrored edge: endpoints swapped, type reversed, strength and metadata copied.
    pub fn mirrored(&self) -> Self {
        Self {
            from_id: self.to_id.clone(),
            to_id: self.from_id.clone(),
            link_type: self.link_type.reverse(),
            strength: self.strength,
            created_at: self.created_at,
            metadata: self.metadata.clone(),
        }
    }
}

fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

/// One node reached by a chain traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    /// The reached node.
    pub id: String,
    /// Nodes from the start up to (not including) `id`.
    pub path: Vec<String>,
    /// Type of the edge that reached this node.
    pub link_type: LinkType,
    /// Strength of the edge that reached this node.
    pub link_strength: f32,
    /// Edges from the start node.
    pub hop_distance: usize,
    /// Creation time of the edge that reached this node.
    pub discovered_at: DateTime<Utc>,
}

/// Options for a filtered traversal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub max_hops: usize,
    pub min_strength: f32,
    /// Keep only these link types. `None` or empty keeps everything.
    pub link_types: Option<Vec<LinkType>>,
}

impl RelatedQuery {
    pub fn new(max_hops: usize, min_strength: f32) -> Self {
        Self {
            max_hops,
            min_strength,
            link_types: None,
        }
    }

    pub fn with_link_types(mut self, link_types: Vec<LinkType>) -> Self {
        self.link_types = Some(link_types);
        self
    }

    /// Whether a link type passes the filter.
    pub fn accepts(&self, link_type: LinkType) -> bool {
        match &self.link_types {
            Some(types) if !types.is_empty() => types.contains(&link_type),
            _ => true,
        }
    }
}
