//! Retrieval output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::link::LinkType;

/// A scored item produced by one `retrieve` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub id: String,
    /// Originating source; empty for graph-only candidates.
    pub source_id: String,
    /// Cosine similarity from the vector stage (0 when graph-only).
    pub vector_score: f32,
    /// Best hop-decayed link strength from the graph stage.
    pub chain_score: f32,
    /// Best raw link strength from the graph stage.
    pub link_strength: f32,
    /// Recency factor in [0, 1].
    pub recency_score: f32,
    /// Composite ranking score.
    pub hybrid_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_distance: Option<usize>,
    /// Event time used for recency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RetrievalCandidate {
    /// Whether the vector stage contributed.
    pub fn has_vector_support(&self) -> bool {
        self.vector_score > 0.0
    }

    /// Whether the graph stage contributed.
    pub fn has_chain_support(&self) -> bool {
        self.chain_score > 0.0
    }
}

/// Summary of a completed retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    pub total_results: usize,
    pub vector_results: usize,
    pub chain_results: usize,
    pub avg_vector_score: f32,
    pub avg_chain_score: f32,
    pub avg_recency_score: f32,
    pub avg_hybrid_score: f32,
    pub elapsed_ms: f64,
    pub results_per_second: f64,
}
