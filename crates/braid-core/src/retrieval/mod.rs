//! Hybrid retrieval: vector similarity fused with relationship chains.
//!
//! The engine runs two stages and merges them per item id:
//! - Vector stage: cosine search over the embedding store
//! - Graph stage: bounded chain traversal from caller-supplied seeds
//!
//! Candidates are then scored with a chain boost and recency decay; see
//! [`fusion`] for the formulas.

mod config;
mod engine;
pub mod fusion;
mod metrics;

pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use engine::{RetrievalFusion, RetrievalOptions};
pub use fusion::{chain_boost, chain_score, recency_score, CandidateSet};
pub use metrics::get_metrics;
