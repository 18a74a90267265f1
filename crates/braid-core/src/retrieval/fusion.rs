//! Candidate merging and score composition.
//!
//! Vector matches and chain results are merged into one candidate per id,
//! then each candidate gets a recency factor and a hybrid score:
//!
//! ```text
//! chain_score  = link_strength * 0.5^(hop_distance - 1)
//! chain_boost  = 1 + chain_weight * link_strength      (1 when link_strength == 0)
//! recency      = clamp(2^(-age_hours / half_life_hours), 0, 1)
//! hybrid_score = vector_score * chain_boost * recency
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;

use crate::types::{ChainResult, EmbeddingMatch, RetrievalCandidate};

use super::config::RetrievalConfig;

/// Provisional hybrid score factor for candidates reached only through the graph.
pub const GRAPH_ONLY_PENALTY: f32 = 0.5;

/// Hop-decayed chain score. Each hop beyond the first halves the strength.
pub fn chain_score(link_strength: f32, hop_distance: usize) -> f32 {
    if hop_distance > 0 {
        link_strength * 0.5_f32.powi(hop_distance as i32 - 1)
    } else {
        link_strength
    }
}

/// Multiplicative boost for candidates with graph support.
pub fn chain_boost(chain_weight: f32, link_strength: f32) -> f32 {
    if link_strength > 0.0 {
        1.0 + chain_weight * link_strength
    } else {
        1.0
    }
}

/// Exponential half-life decay, clamped to [0, 1].
///
/// A non-positive half-life disables decay. Negative ages (future events)
/// clamp to 1.
pub fn recency_score(age_hours: f64, half_life_hours: f64) -> f32 {
    if half_life_hours <= 0.0 || age_hours.is_nan() {
        return 1.0;
    }
    2f64.powf(-age_hours / half_life_hours).clamp(0.0, 1.0) as f32
}

/// Insertion-ordered candidate map keyed by item id.
#[derive(Debug, Default)]
pub struct CandidateSet {
    index: HashMap<String, usize>,
    candidates: Vec<RetrievalCandidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RetrievalCandidate> {
        self.index.get(id).map(|&i| &self.candidates[i])
    }

    /// Seed candidates from vector matches.
    ///
    /// A store may hold several records for one id; the first (highest
    /// scoring) match is kept.
    pub fn merge_vector(&mut self, matches: Vec<EmbeddingMatch>) {
        for m in matches {
            if self.index.contains_key(&m.id) {
                continue;
            }
            self.push(RetrievalCandidate {
                id: m.id,
                source_id: m.source_id,
                vector_score: m.score,
                chain_score: 0.0,
                link_strength: 0.0,
                recency_score: 1.0,
                hybrid_score: m.score,
                link_type: None,
                hop_distance: None,
                timestamp: Some(m.timestamp),
            });
        }
    }

    /// Fold chain results into the set.
    ///
    /// Existing candidates keep the maximum chain score and link strength seen
    /// so far and take the link type and hop distance of the latest result.
    /// New candidates have no vector support and a penalized provisional score.
    pub fn merge_chain(&mut self, results: Vec<ChainResult>) {
        for r in results {
            let score = chain_score(r.link_strength, r.hop_distance);

            if let Some(&i) = self.index.get(&r.id) {
                let existing = &mut self.candidates[i];
                existing.chain_score = existing.chain_score.max(score);
                existing.link_strength = existing.link_strength.max(r.link_strength);
                existing.link_type = Some(r.link_type);
                existing.hop_distance = Some(r.hop_distance);
                continue;
            }

            self.push(RetrievalCandidate {
                id: r.id,
                source_id: String::new(),
                vector_score: 0.0,
                chain_score: score,
                link_strength: r.link_strength,
                recency_score: 1.0,
                hybrid_score: score * GRAPH_ONLY_PENALTY,
                link_type: Some(r.link_type),
                hop_distance: Some(r.hop_distance),
                timestamp: Some(r.discovered_at),
            });
        }
    }

    /// Apply recency and the final hybrid score to every candidate.
    pub fn score(&mut self, config: &RetrievalConfig, now: DateTime<Utc>) {
        let decay = config.decay_enabled();

        for candidate in &mut self.candidates {
            if decay {
                candidate.recency_score = match candidate.timestamp {
                    Some(ts) => {
                        let age_hours = (now - ts).num_milliseconds() as f64 / 3_600_000.0;
                        recency_score(age_hours, config.recency_half_life_hours)
                    }
                    None => 1.0,
                };
            }

            // vector_weight is intentionally absent from this formula.
            candidate.hybrid_score = candidate.vector_score
                * chain_boost(config.chain_weight, candidate.link_strength)
                * candidate.recency_score;
        }
    }

    /// Drop candidates below `min_score`, sort descending, truncate.
    ///
    /// The sort is stable: equal scores keep merge order (vector matches
    /// first, in search order, then graph discoveries).
    pub fn rank(self, min_score: f32, max_results: usize) -> Vec<RetrievalCandidate> {
        let mut ranked: Vec<_> = self
            .candidates
            .into_iter()
            .filter(|c| c.hybrid_score >= min_score)
            .collect();
        ranked.sort_by(|a, b| OrderedFloat(b.hybrid_score).cmp(&OrderedFloat(a.hybrid_score)));
        ranked.truncate(max_results);
        ranked
    }

    fn push(&mut self, candidate: RetrievalCandidate) {
        self.index.insert(candidate.id.clone(), self.candidates.len());
        self.candidates.push(candidate);
    }
}
