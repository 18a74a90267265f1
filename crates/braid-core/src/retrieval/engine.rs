//! Retrieval engine fusing vector similarity with relationship chains.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::{try_join, try_join_all};

use crate::error::BraidResult;
use crate::traits::{EmbeddingStore, RelationshipGraphStore};
use crate::types::{ChainResult, RetrievalCandidate, RetrievalMetrics};

use super::config::RetrievalConfig;
use super::fusion::CandidateSet;
use super::metrics::get_metrics;

/// Per-call retrieval options.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalOptions {
    /// Maximum number of candidates returned. Default: 10
    pub max_results: usize,
    /// Candidates scoring below this are dropped. Default: 0.3
    pub min_score: f32,
    /// Restrict the vector stage to these partitions.
    pub partitions: Option<Vec<i64>>,
    /// Reference time for recency; `Utc::now()` when unset.
    pub now: Option<DateTime<Utc>>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            min_score: 0.3,
            partitions: None,
            now: None,
        }
    }
}

impl RetrievalOptions {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            ..Default::default()
        }
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_partitions(mut self, partitions: Vec<i64>) -> Self {
        self.partitions = Some(partitions);
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// Hybrid retrieval over an embedding store and a relationship graph.
pub struct RetrievalFusion<E, G>
where
    E: EmbeddingStore + ?Sized,
    G: RelationshipGraphStore + ?Sized,
{
    embeddings: Arc<E>,
    graph: Arc<G>,
    config: RetrievalConfig,
}

impl<E, G> RetrievalFusion<E, G>
where
    E: EmbeddingStore + ?Sized,
    G: RelationshipGraphStore + ?Sized,
{
    /// Create an engine. An invalid configuration is logged, not rejected.
    pub fn new(embeddings: Arc<E>, graph: Arc<G>, config: RetrievalConfig) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!("{}", e);
        }
        Self {
            embeddings,
            graph,
            config,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn embeddings(&self) -> &Arc<E> {
        &self.embeddings
    }

    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    /// Retrieve up to `options.max_results` candidates for a query vector,
    /// boosted by relationship chains reachable from `seed_ids`.
    ///
    /// Results are sorted by hybrid score descending and all score at least
    /// `options.min_score`.
    pub async fn retrieve(
        &self,
        query: &[f32],
        seed_ids: &[String],
        options: &RetrievalOptions,
    ) -> BraidResult<Vec<RetrievalCandidate>> {
        let k = options
            .max_results
            .saturating_mul(self.config.vector_candidate_multiplier);

        let (vector_matches, chains) = try_join(
            self.embeddings
                .search(query, k, options.partitions.as_deref()),
            self.collect_chains(seed_ids),
        )
        .await?;

        let vector_count = vector_matches.len();
        let chain_count = chains.len();

        let mut candidates = CandidateSet::new();
        candidates.merge_vector(vector_matches);
        candidates.merge_chain(chains);
        let merged = candidates.len();

        candidates.score(&self.config, options.now.unwrap_or_else(Utc::now));
        let results = candidates.rank(options.min_score, options.max_results);

        tracing::debug!(
            vector_candidates = vector_count,
            chain_candidates = chain_count,
            merged,
            returned = results.len(),
            "Hybrid retrieval complete"
        );

        Ok(results)
    }

    /// Summarise a result list. `start` is when the caller began timing.
    pub fn get_metrics(&self, results: &[RetrievalCandidate], start: Instant) -> RetrievalMetrics {
        get_metrics(results, start)
    }

    /// Traverse from every seed, concatenated in seed order and capped.
    async fn collect_chains(&self, seed_ids: &[String]) -> BraidResult<Vec<ChainResult>> {
        if seed_ids.is_empty() || self.config.max_hops == 0 {
            return Ok(Vec::new());
        }

        let per_seed = try_join_all(seed_ids.iter().map(|seed| {
            self.graph.traverse_chain(
                seed,
                self.config.max_hops,
                self.config.min_link_strength,
            )
        }))
        .await?;

        let mut chains: Vec<ChainResult> = per_seed.into_iter().flatten().collect();
        if chains.len() > self.config.max_chain_candidates {
            tracing::debug!(
                found = chains.len(),
                cap = self.config.max_chain_candidates,
                "Truncating chain candidates"
            );
            chains.truncate(self.config.max_chain_candidates);
        }
        Ok(chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::similarity;
    use crate::types::{EmbeddingMatch, EmbeddingRecord, LinkType, RelationshipLink};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;

    // In-memory stand-ins for the store backends
    struct MockEmbeddings {
        records: Vec<EmbeddingRecord>,
    }

    #[async_trait]
    impl EmbeddingStore for MockEmbeddings {
        async fn save(
            &self,
            _: &str,
            _: Vec<f32>,
            _: i64,
            _: DateTime<Utc>,
            _: &str,
        ) -> BraidResult<()> {
            Ok(())
        }

        async fn load(&self, _: Option<&[i64]>) -> BraidResult<Vec<EmbeddingRecord>> {
            Ok(self.records.clone())
        }

        async fn search(
            &self,
            query: &[f32],
            k: usize,
            _: Option<&[i64]>,
        ) -> BraidResult<Vec<EmbeddingMatch>> {
            let mut matches: Vec<EmbeddingMatch> = self
                .records
                .iter()
                .map(|r| EmbeddingMatch {
                    id: r.id.clone(),
                    source_id: r.source_id.clone(),
                    score: similarity(query, &r.vector),
                    partition: r.partition,
                    timestamp: r.timestamp,
                })
                .filter(|m| m.score > 0.0)
                .collect();
            matches.sort_by(|a, b| b.score.total_cmp(&a.score));
            matches.truncate(k);
            Ok(matches)
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct MockGraph {
        chains: HashMap<String, Vec<ChainResult>>,
    }

    #[async_trait]
    impl RelationshipGraphStore for MockGraph {
        async fn add_link(
            &self,
            _: &str,
            _: &str,
            _: LinkType,
            _: f32,
            _: Option<HashMap<String, serde_json::Value>>,
        ) -> BraidResult<()> {
            Ok(())
        }

        async fn remove_link(&self, _: &str, _: &str) -> BraidResult<bool> {
            Ok(false)
        }

        async fn get_links(&self, _: &str) -> BraidResult<Vec<RelationshipLink>> {
            Ok(Vec::new())
        }

        async fn traverse_chain(
            &self,
            start: &str,
            max_hops: usize,
            min_strength: f32,
        ) -> BraidResult<Vec<ChainResult>> {
            Ok(self
                .chains
                .get(start)
                .into_iter()
                .flatten()
                .filter(|c| c.hop_distance <= max_hops && c.link_strength >= min_strength)
                .cloned()
                .collect())
        }
    }

    fn record(id: &str, vector: Vec<f32>, ts: DateTime<Utc>) -> EmbeddingRecord {
        EmbeddingRecord::new(id, vector, ts, format!("src-{}", id))
    }

    fn chain(id: &str, strength: f32, hops: usize) -> ChainResult {
        ChainResult {
            id: id.to_string(),
            path: vec!["seed".to_string()],
            link_type: LinkType::Related,
            link_strength: strength,
            hop_distance: hops,
            discovered_at: Utc::now(),
        }
    }

    fn engine(
        records: Vec<EmbeddingRecord>,
        chains: HashMap<String, Vec<ChainResult>>,
        config: RetrievalConfig,
    ) -> RetrievalFusion<MockEmbeddings, MockGraph> {
        RetrievalFusion::new(
            Arc::new(MockEmbeddings { records }),
            Arc::new(MockGraph { chains }),
            config,
        )
    }

    #[tokio::test]
    async fn test_chain_boost_reorders_results() {
        let now = Utc::now();
        let records = vec![
            record("x", vec![1.0, 0.0], now),
            record("y", vec![0.9, 0.1], now),
        ];
        let chains = HashMap::from([("seed".to_string(), vec![chain("y", 0.9, 1)])]);
        let config = RetrievalConfig::builder()
            .recency_boost(false)
            .chain_weight(0.5)
            .build();

        let fusion = engine(records, chains, config);
        let results = fusion
            .retrieve(&[1.0, 0.0], &["seed".to_string()], &RetrievalOptions::default())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        // y: ~0.9939 * 1.45 beats x: 1.0
        assert_eq!(results[0].id, "y");
        assert!(results[0].hybrid_score > 1.4);
        assert_eq!(results[0].link_type, Some(LinkType::Related));
        assert_eq!(results[1].id, "x");
    }

    #[tokio::test]
    async fn test_graph_only_candidates_filtered_by_min_score() {
        let now = Utc::now();
        let records = vec![record("x", vec![1.0, 0.0], now)];
        let chains = HashMap::from([("seed".to_string(), vec![chain("g", 1.0, 1)])]);
        let fusion = engine(records, chains, RetrievalConfig::default());

        let results = fusion
            .retrieve(&[1.0, 0.0], &["seed".to_string()], &RetrievalOptions::default())
            .await
            .unwrap();

        let ids: Vec<_> = results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["x"]);
    }

    #[tokio::test]
    async fn test_respects_bounds() {
        let now = Utc::now();
        let records: Vec<_> = (0..20)
            .map(|i| record(&format!("r{}", i), vec![1.0, i as f32 * 0.05], now))
            .collect();
        let fusion = engine(records, HashMap::new(), RetrievalConfig::default());

        let options = RetrievalOptions::new(5).with_min_score(0.5);
        let results = fusion.retrieve(&[1.0, 0.0], &[], &options).await.unwrap();

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|c| c.hybrid_score >= 0.5));
        assert!(results
            .windows(2)
            .all(|w| w[0].hybrid_score >= w[1].hybrid_score));
    }

    #[tokio::test]
    async fn test_recency_uses_reference_time() {
        let now = Utc::now();
        let records = vec![
            record("fresh", vec![1.0, 0.0], now),
            record("stale", vec![1.0, 0.0], now - Duration::hours(48)),
        ];
        let config = RetrievalConfig::builder()
            .recency_half_life_hours(24.0)
            .build();
        let fusion = engine(records, HashMap::new(), config);

        let options = RetrievalOptions::default().with_min_score(0.0).with_now(now);
        let results = fusion.retrieve(&[1.0, 0.0], &[], &options).await.unwrap();

        assert_eq!(results[0].id, "fresh");
        assert!((results[0].recency_score - 1.0).abs() < 1e-4);
        assert_eq!(results[1].id, "stale");
        assert!((results[1].recency_score - 0.25).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_chain_candidates_are_capped() {
        let now = Utc::now();
        let records = vec![
            record("a", vec![1.0, 0.0], now),
            record("b", vec![1.0, 0.0], now),
        ];
        let chains = HashMap::from([
            ("s1".to_string(), vec![chain("a", 0.9, 1)]),
            ("s2".to_string(), vec![chain("b", 0.9, 1)]),
        ]);
        let config = RetrievalConfig::builder()
            .recency_boost(false)
            .max_chain_candidates(1)
            .build();
        let fusion = engine(records, chains, config);

        let seeds = vec!["s1".to_string(), "s2".to_string()];
        let results = fusion
            .retrieve(&[1.0, 0.0], &seeds, &RetrievalOptions::default())
            .await
            .unwrap();

        let a = results.iter().find(|c| c.id == "a").unwrap();
        let b = results.iter().find(|c| c.id == "b").unwrap();
        assert!(a.has_chain_support());
        assert!(!b.has_chain_support());
    }

    #[tokio::test]
    async fn test_zero_max_hops_skips_graph() {
        let now = Utc::now();
        let records = vec![record("a", vec![1.0, 0.0], now)];
        let chains = HashMap::from([("seed".to_string(), vec![chain("a", 0.9, 1)])]);
        let config = RetrievalConfig::builder()
            .recency_boost(false)
            .max_hops(0)
            .build();
        let fusion = engine(records, chains, config);

        let results = fusion
            .retrieve(&[1.0, 0.0], &["seed".to_string()], &RetrievalOptions::default())
            .await
            .unwrap();
        assert_eq!(results[0].chain_score, 0.0);
        assert!((results[0].hybrid_score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_empty_stores() {
        let fusion = engine(Vec::new(), HashMap::new(), RetrievalConfig::default());
        let start = Instant::now();
        let results = fusion
            .retrieve(&[1.0, 0.0], &["nope".to_string()], &RetrievalOptions::default())
            .await
            .unwrap();
        assert!(results.is_empty());

        let metrics = fusion.get_metrics(&results, start);
        assert_eq!(metrics.total_results, 0);
        assert_eq!(metrics.avg_hybrid_score, 0.0);
    }
}
