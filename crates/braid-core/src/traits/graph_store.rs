//! Relationship graph store trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::BraidResult;
use crate::types::{ChainResult, LinkType, RelatedQuery, RelationshipLink};

/// Core RelationshipGraphStore trait - all graph store backends implement this.
#[async_trait]
pub trait RelationshipGraphStore: Send + Sync {
    /// Insert `from -> to` and its mirror. Existing edges are left untouched.
    async fn add_link(
        &self,
        from: &str,
        to: &str,
        link_type: LinkType,
        strength: f32,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> BraidResult<()>;

    /// Remove the forward edge `from -> to` only. Returns whether an edge was removed.
    async fn remove_link(&self, from: &str, to: &str) -> BraidResult<bool>;

    /// Outgoing edges of a node, in insertion order.
    async fn get_links(&self, id: &str) -> BraidResult<Vec<RelationshipLink>>;

    /// Bounded breadth-first traversal from `start`.
    async fn traverse_chain(
        &self,
        start: &str,
        max_hops: usize,
        min_strength: f32,
    ) -> BraidResult<Vec<ChainResult>>;

    /// Traversal restricted to the query's link types.
    async fn find_related(&self, id: &str, query: &RelatedQuery) -> BraidResult<Vec<ChainResult>> {
        let results = self
            .traverse_chain(id, query.max_hops, query.min_strength)
            .await?;
        Ok(results
            .into_iter()
            .filter(|r| query.accepts(r.link_type))
            .collect())
    }
}
