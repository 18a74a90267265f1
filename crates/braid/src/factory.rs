//! Factory for assembling a retriever from configuration.

use std::sync::Arc;

use braid_core::config::BraidConfig;
use braid_core::diagnostics::{tracing_diagnostics, SharedDiagnostics};
use braid_core::error::BraidResult;
use braid_core::retrieval::RetrievalFusion;
use braid_graph_stores::AdjacencyGraphStore;
use braid_vector_stores::JsonlEmbeddingStore;

/// Retrieval engine over the file-backed stores.
pub type Retriever = RetrievalFusion<JsonlEmbeddingStore, AdjacencyGraphStore>;

/// Factory for creating retrievers.
pub struct RetrieverFactory;

impl RetrieverFactory {
    /// Open both stores under `config.storage.data_dir` and build the engine.
    pub async fn from_config(config: &BraidConfig) -> BraidResult<Retriever> {
        Self::with_diagnostics(config, tracing_diagnostics()).await
    }

    /// Same as [`from_config`](Self::from_config) with an explicit diagnostics sink
    /// shared by both stores.
    pub async fn with_diagnostics(
        config: &BraidConfig,
        diagnostics: SharedDiagnostics,
    ) -> BraidResult<Retriever> {
        let embeddings = JsonlEmbeddingStore::with_diagnostics(
            config.storage.embeddings_dir(),
            config.storage.dimension,
            Arc::clone(&diagnostics),
        )
        .await?;

        let graph =
            AdjacencyGraphStore::with_diagnostics(config.storage.graph_index_path(), diagnostics)
                .await?;

        tracing::info!(
            data_dir = %config.storage.data_dir.display(),
            dimension = config.storage.dimension,
            "Retriever ready"
        );

        Ok(RetrievalFusion::new(
            Arc::new(embeddings),
            Arc::new(graph),
            config.retrieval.clone(),
        ))
    }
}
