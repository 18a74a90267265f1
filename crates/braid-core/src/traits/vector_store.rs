//! Embedding store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BraidResult;
use crate::types::{EmbeddingMatch, EmbeddingRecord};

/// Core EmbeddingStore trait - all embedding store backends implement this.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Append one record to a partition. Re-saving an id appends a duplicate.
    async fn save(
        &self,
        id: &str,
        vector: Vec<f32>,
        partition: i64,
        timestamp: DateTime<Utc>,
        source_id: &str,
    ) -> BraidResult<()>;

    /// Load records from the given partitions, or from all partitions when `None`.
    ///
    /// Malformed and dimension-mismatched records are skipped.
    async fn load(&self, partitions: Option<&[i64]>) -> BraidResult<Vec<EmbeddingRecord>>;

    /// Linear-scan cosine search.
    ///
    /// Returns at most `k` matches with score > 0, sorted by score descending.
    async fn search(
        &self,
        query: &[f32],
        k: usize,
        partitions: Option<&[i64]>,
    ) -> BraidResult<Vec<EmbeddingMatch>>;

    /// Configured vector dimension.
    fn dimension(&self) -> usize;
}
