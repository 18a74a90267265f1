//! braid - Hybrid vector + relationship-graph retrieval for agent memory.
//!
//! Items are retrieved by fusing cosine similarity over stored embeddings
//! with typed, weighted links between items. Embeddings arrive pre-computed;
//! this crate only stores, links, and ranks them.
//!
//! # Example
//!
//! ```ignore
//! use braid::{BraidConfig, LinkType, RetrievalOptions, RetrieverFactory};
//!
//! let config = BraidConfig::builder().data_dir("/var/lib/agent").dimension(768).build();
//! let retriever = RetrieverFactory::from_config(&config).await?;
//!
//! retriever.embeddings().save("note-1", vector, partition, timestamp, "session-7").await?;
//! retriever.graph().add_link("note-1", "note-0", LinkType::Sequential, 0.8, None).await?;
//!
//! let results = retriever
//!     .retrieve(&query, &["note-0".to_string()], &RetrievalOptions::default())
//!     .await?;
//! ```

mod factory;

pub use factory::{Retriever, RetrieverFactory};

// Re-export core types
pub use braid_core::{
    get_metrics, normalize, partition_for, similarity, BraidConfig, BraidConfigBuilder,
    BraidError, BraidResult, ChainResult, CollectingDiagnostics, DiagnosticsSink,
    EmbeddingMatch, EmbeddingRecord, EmbeddingStore, ErrorCode, LinkType, RelatedQuery,
    RelationshipGraphStore, RelationshipLink, RetrievalCandidate, RetrievalConfig,
    RetrievalFusion, RetrievalMetrics, RetrievalOptions, SharedDiagnostics, StorageConfig,
    TracingDiagnostics, DEFAULT_LINK_STRENGTH,
};
pub use braid_graph_stores::AdjacencyGraphStore;
pub use braid_vector_stores::JsonlEmbeddingStore;
