//! File-backed relationship graph store.
//!
//! This module provides a graph store that:
//! - Persists the adjacency index as a single JSON document
//! - Mirrors every inserted edge with its reverse
//! - Runs bounded chain traversal in memory over a fresh read of the index
//!
//! Writers are serialised inside one process; the document is replaced
//! atomically so readers never observe a partial write.

pub mod index;
pub mod traversal;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use braid_core::diagnostics::{tracing_diagnostics, SharedDiagnostics};
use braid_core::error::{BraidError, BraidResult};
use braid_core::traits::RelationshipGraphStore;
use braid_core::types::{ChainResult, LinkType, RelationshipLink};

use index::{load_index, persist_index, AdjacencyIndex};

/// Graph store backed by one adjacency document.
pub struct AdjacencyGraphStore {
    path: PathBuf,
    diagnostics: SharedDiagnostics,
    write_lock: Mutex<()>,
}

impl AdjacencyGraphStore {
    /// Open the store whose index lives at `path`, reporting to `tracing`.
    pub async fn open(path: impl Into<PathBuf>) -> BraidResult<Self> {
        Self::with_diagnostics(path, tracing_diagnostics()).await
    }

    /// Open with an explicit diagnostics sink.
    ///
    /// A missing parent directory is created and reported.
    pub async fn with_diagnostics(
        path: impl Into<PathBuf>,
        diagnostics: SharedDiagnostics,
    ) -> BraidResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !tokio::fs::try_exists(parent).await? {
                diagnostics.report(&BraidError::storage_unavailable(
                    parent,
                    "graph directory missing, creating it",
                ));
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tracing::debug!(path = %path.display(), "Opened adjacency graph store");

        Ok(Self {
            path,
            diagnostics,
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the index document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> BraidResult<AdjacencyIndex> {
        load_index(&self.path, self.diagnostics.as_ref()).await
    }

    /// Insert a prepared link and its mirror.
    pub async fn insert_link(&self, link: RelationshipLink) -> BraidResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load().await?;

        let mirror = link.mirrored();
        let forward = index.insert(link);
        let reverse = index.insert(mirror);

        if forward || reverse {
            persist_index(&self.path, &index).await?;
        }
        Ok(())
    }

    /// Remove `from -> to` and `to -> from`. Returns the number of edges removed.
    pub async fn remove_link_pair(&self, from: &str, to: &str) -> BraidResult<usize> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load().await?;

        let removed = [index.remove(from, to), index.remove(to, from)]
            .into_iter()
            .filter(|r| *r)
            .count();

        if removed > 0 {
            persist_index(&self.path, &index).await?;
        }
        Ok(removed)
    }

    /// Number of nodes with outgoing edges.
    pub async fn node_count(&self) -> BraidResult<usize> {
        Ok(self.load().await?.node_count())
    }

    /// Number of directed edges, mirrors included.
    pub async fn link_count(&self) -> BraidResult<usize> {
        Ok(self.load().await?.link_count())
    }
}

#[async_trait]
impl RelationshipGraphStore for AdjacencyGraphStore {
    async fn add_link(
        &self,
        from: &str,
        to: &str,
        link_type: LinkType,
        strength: f32,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> BraidResult<()> {
        let link = RelationshipLink::new(from, to, link_type, strength, Utc::now())
            .with_metadata(metadata);
        self.insert_link(link).await
    }

    async fn remove_link(&self, from: &str, to: &str) -> BraidResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut index = self.load().await?;

        let removed = index.remove(from, to);
        if removed {
            persist_index(&self.path, &index).await?;
        }
        Ok(removed)
    }

    async fn get_links(&self, id: &str) -> BraidResult<Vec<RelationshipLink>> {
        Ok(self.load().await?.links(id).to_vec())
    }

    async fn traverse_chain(
        &self,
        start: &str,
        max_hops: usize,
        min_strength: f32,
    ) -> BraidResult<Vec<ChainResult>> {
        if max_hops == 0 {
            return Ok(Vec::new());
        }
        let index = self.load().await?;
        Ok(traversal::traverse_chain(&index, start, max_hops, min_strength))
    }
}

impl std::fmt::Debug for AdjacencyGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdjacencyGraphStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::diagnostics::{CollectingDiagnostics, DiagnosticsSink};
    use braid_core::error::ErrorCode;
    use braid_core::types::{RelatedQuery, DEFAULT_LINK_STRENGTH};
    use std::sync::Arc;

    mockall::mock! {
        Sink {}
        impl DiagnosticsSink for Sink {
            fn report(&self, error: &BraidError);
        }
    }

    async fn store(dir: &Path) -> AdjacencyGraphStore {
        AdjacencyGraphStore::open(dir.join("graph").join("links.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_link_creates_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        store
            .add_link("x", "y", LinkType::Parent, 0.8, None)
            .await
            .unwrap();

        let forward = store.get_links("x").await.unwrap();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].to_id, "y");
        assert_eq!(forward[0].link_type, LinkType::Parent);

        let mirror = store.get_links("y").await.unwrap();
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror[0].to_id, "x");
        assert_eq!(mirror[0].link_type, LinkType::Child);
        assert!((mirror[0].strength - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_readding_keeps_first_link() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        store
            .add_link("a", "b", LinkType::Causal, 0.6, None)
            .await
            .unwrap();
        store
            .add_link("a", "b", LinkType::Reference, 0.9, None)
            .await
            .unwrap();

        let links = store.get_links("a").await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link_type, LinkType::Causal);
        assert!((links[0].strength - 0.6).abs() < f32::EPSILON);
        assert_eq!(store.link_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_strength_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        store
            .add_link("a", "b", LinkType::Related, 3.0, None)
            .await
            .unwrap();
        store
            .add_link("c", "d", LinkType::Related, -1.0, None)
            .await
            .unwrap();

        assert_eq!(store.get_links("a").await.unwrap()[0].strength, 1.0);
        assert_eq!(store.get_links("c").await.unwrap()[0].strength, 0.0);
    }

    #[tokio::test]
    async fn test_remove_link_leaves_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        store
            .add_link("a", "b", LinkType::Related, DEFAULT_LINK_STRENGTH, None)
            .await
            .unwrap();

        assert!(store.remove_link("a", "b").await.unwrap());
        assert!(!store.remove_link("a", "b").await.unwrap());
        assert!(store.get_links("a").await.unwrap().is_empty());
        assert_eq!(store.get_links("b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_link_pair_removes_both() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        store
            .add_link("a", "b", LinkType::Sequential, 0.5, None)
            .await
            .unwrap();

        assert_eq!(store.remove_link_pair("b", "a").await.unwrap(), 2);
        assert_eq!(store.link_count().await.unwrap(), 0);
        assert_eq!(store.remove_link_pair("a", "b").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_metadata_is_stored_on_both_directions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        let metadata = HashMap::from([("reason".to_string(), serde_json::json!("follow-up"))]);
        store
            .add_link("a", "b", LinkType::Reference, 0.7, Some(metadata))
            .await
            .unwrap();

        let back = store.get_links("b").await.unwrap();
        let stored = back[0].metadata.as_ref().unwrap();
        assert_eq!(stored["reason"], "follow-up");
    }

    #[tokio::test]
    async fn test_traverse_and_find_related() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path()).await;

        store
            .add_link("x", "y", LinkType::Parent, 0.9, None)
            .await
            .unwrap();
        store
            .add_link("y", "z", LinkType::Causal, 0.4, None)
            .await
            .unwrap();

        let chain = store.traverse_chain("x", 3, 0.5).await.unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].id, "y");
        assert_eq!(chain[0].hop_distance, 1);

        let causal = RelatedQuery::new(3, 0.3).with_link_types(vec![LinkType::Causal]);
        let related = store.find_related("x", &causal).await.unwrap();
        let ids: Vec<_> = related.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z"]);

        assert!(store.traverse_chain("x", 0, 0.0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = store(dir.path()).await;
            store
                .add_link("a", "b", LinkType::Child, 0.5, None)
                .await
                .unwrap();
        }

        let reopened = store(dir.path()).await;
        assert_eq!(reopened.node_count().await.unwrap(), 2);
        assert_eq!(
            reopened.get_links("b").await.unwrap()[0].link_type,
            LinkType::Parent
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = MockSink::new();
        sink.expect_report()
            .withf(|e: &BraidError| e.code() == ErrorCode::StoDirectoryMissing)
            .times(1)
            .return_const(());

        let path = dir.path().join("new").join("links.json");
        let store = AdjacencyGraphStore::with_diagnostics(&path, Arc::new(sink))
            .await
            .unwrap();

        assert!(path.parent().unwrap().exists());
        assert!(store.get_links("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_index_behaves_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "{\"a\": [").unwrap();

        let sink = CollectingDiagnostics::new();
        let store = AdjacencyGraphStore::with_diagnostics(&path, Arc::new(sink.clone()))
            .await
            .unwrap();

        assert!(store.traverse_chain("a", 2, 0.0).await.unwrap().is_empty());
        assert_eq!(sink.codes(), vec![ErrorCode::RecMalformed]);

        // the next write replaces the corrupt document
        store
            .add_link("a", "b", LinkType::Related, 0.5, None)
            .await
            .unwrap();
        assert_eq!(store.link_count().await.unwrap(), 2);
    }
}
