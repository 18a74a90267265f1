//! Embedding record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;

/// One persisted embedding. Stored append-only per partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRecord {
    /// Item identifier.
    pub id: String,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Coarse time bucket the record is stored under.
    pub partition: i64,
    /// Event time of the item.
    pub timestamp: DateTime<Utc>,
    /// Identifier of the originating source (session, document, ...).
    pub source_id: String,
}

impl EmbeddingRecord {
    /// Create a record, deriving the partition from the timestamp.
    pub fn new(
        id: impl Into<String>,
        vector: Vec<f32>,
        timestamp: DateTime<Utc>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            vector,
            partition: partition_for(timestamp),
            timestamp,
            source_id: source_id.into(),
        }
    }

    /// Override the partition.
    pub fn with_partition(mut self, partition: i64) -> Self {
        self.partition = partition;
        self
    }
}

/// A scored hit from an embedding search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMatch {
    pub id: String,
    pub source_id: String,
    /// Cosine similarity, always > 0.
    pub score: f32,
    pub partition: i64,
    pub timestamp: DateTime<Utc>,
}

/// Partition (weeks since the Unix epoch) for a timestamp.
pub fn partition_for(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp().div_euclid(SECONDS_PER_WEEK)
}
