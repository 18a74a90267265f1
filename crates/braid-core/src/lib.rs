//! braid-core - Core library for braid.
//!
//! This crate provides the types, store traits, configuration, and the
//! hybrid retrieval engine that fuses embedding similarity with an explicit
//! relationship graph.
//!
//! # Example
//!
//! ```ignore
//! use braid_core::{RetrievalConfig, RetrievalFusion, RetrievalOptions};
//!
//! let fusion = RetrievalFusion::new(embeddings, graph, RetrievalConfig::default());
//! let results = fusion
//!     .retrieve(&query_vector, &["conv-42".to_string()], &RetrievalOptions::default())
//!     .await?;
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod retrieval;
pub mod similarity;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{BraidConfig, BraidConfigBuilder, StorageConfig};
pub use diagnostics::{
    tracing_diagnostics, CollectingDiagnostics, DiagnosticsSink, RecordOutcome,
    SharedDiagnostics, TracingDiagnostics,
};
pub use error::{BraidError, BraidResult, ErrorCode};
pub use retrieval::{
    get_metrics, RetrievalConfig, RetrievalConfigBuilder, RetrievalFusion, RetrievalOptions,
};
pub use similarity::{normalize, similarity};
pub use traits::{EmbeddingStore, RelationshipGraphStore};
pub use types::{
    partition_for, ChainResult, EmbeddingMatch, EmbeddingRecord, LinkType, RelatedQuery,
    RelationshipLink, RetrievalCandidate, RetrievalMetrics, DEFAULT_LINK_STRENGTH,
};
