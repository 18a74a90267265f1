//! Configuration for hybrid retrieval scoring.

use serde::{Deserialize, Serialize};

use crate::error::{BraidError, BraidResult};

/// Scoring and traversal parameters, fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Weight of the vector signal.
    ///
    /// Part of the configuration contract but not applied by the hybrid
    /// score formula; see `CandidateSet::score`.
    pub vector_weight: f32,

    /// Multiplier on link strength in the chain boost `1 + chain_weight * strength`.
    /// Default: 0.3
    pub chain_weight: f32,

    /// Half-life of the recency decay, in hours.
    /// Zero or negative disables decay. Default: 168 (one week)
    pub recency_half_life_hours: f64,

    /// Maximum traversal depth from each seed. Default: 2
    pub max_hops: usize,

    /// Edges weaker than this are not followed. Default: 0.3
    pub min_link_strength: f32,

    /// Upper bound on graph-stage results merged per call. Default: 50
    pub max_chain_candidates: usize,

    /// Vector stage fetches `max_results * multiplier` candidates. Default: 3
    pub vector_candidate_multiplier: usize,

    /// Whether recency decay is applied. Default: true
    pub recency_boost: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            vector_weight: 0.7,
            chain_weight: 0.3,
            recency_half_life_hours: 168.0,
            max_hops: 2,
            min_link_strength: 0.3,
            max_chain_candidates: 50,
            vector_candidate_multiplier: 3,
            recency_boost: true,
        }
    }
}

impl RetrievalConfig {
    /// Start from defaults and override selected values.
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }

    /// Whether recency decay has any effect under this configuration.
    pub fn decay_enabled(&self) -> bool {
        self.recency_boost && self.recency_half_life_hours > 0.0
    }

    /// Validate configuration values are in valid ranges.
    ///
    /// A non-positive half-life is not an error: it disables decay.
    pub fn validate(&self) -> BraidResult<()> {
        if self.vector_weight < 0.0 || self.vector_weight.is_nan() {
            return Err(BraidError::invalid_config(
                "vector_weight",
                "vector_weight must be non-negative",
            ));
        }
        if self.chain_weight < 0.0 || self.chain_weight.is_nan() {
            return Err(BraidError::invalid_config(
                "chain_weight",
                "chain_weight must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_link_strength) {
            return Err(BraidError::invalid_config(
                "min_link_strength",
                "min_link_strength must be between 0.0 and 1.0",
            ));
        }
        if self.vector_candidate_multiplier == 0 {
            return Err(BraidError::invalid_config(
                "vector_candidate_multiplier",
                "vector_candidate_multiplier must be at least 1",
            ));
        }
        if self.max_chain_candidates == 0 {
            return Err(BraidError::invalid_config(
                "max_chain_candidates",
                "max_chain_candidates must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Builder for RetrievalConfig.
#[derive(Debug, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    pub fn vector_weight(mut self, weight: f32) -> Self {
        self.config.vector_weight = weight;
        self
    }

    pub fn chain_weight(mut self, weight: f32) -> Self {
        self.config.chain_weight = weight;
        self
    }

    pub fn recency_half_life_hours(mut self, hours: f64) -> Self {
        self.config.recency_half_life_hours = hours;
        self
    }

    pub fn max_hops(mut self, hops: usize) -> Self {
        self.config.max_hops = hops;
        self
    }

    pub fn min_link_strength(mut self, strength: f32) -> Self {
        self.config.min_link_strength = strength;
        self
    }

    pub fn max_chain_candidates(mut self, max: usize) -> Self {
        self.config.max_chain_candidates = max;
        self
    }

    pub fn vector_candidate_multiplier(mut self, multiplier: usize) -> Self {
        self.config.vector_candidate_multiplier = multiplier;
        self
    }

    pub fn recency_boost(mut self, enabled: bool) -> Self {
        self.config.recency_boost = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RetrievalConfig {
        self.config
    }
}
