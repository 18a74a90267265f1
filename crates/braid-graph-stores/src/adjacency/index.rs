//! On-disk adjacency index.
//!
//! The whole graph is one JSON object mapping node id to its outgoing edges.
//! It is read in full for every operation and rewritten in full on every
//! mutation.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use braid_core::diagnostics::{DiagnosticsSink, RecordOutcome};
use braid_core::error::{BraidError, BraidResult};
use braid_core::types::RelationshipLink;

/// Node id to outgoing edges, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyIndex {
    nodes: BTreeMap<String, Vec<RelationshipLink>>,
}

impl AdjacencyIndex {
    /// Insert a directed edge unless `from -> to` already exists.
    ///
    /// Returns whether the edge was inserted.
    pub fn insert(&mut self, link: RelationshipLink) -> bool {
        let edges = self.nodes.entry(link.from_id.clone()).or_default();
        if edges.iter().any(|e| e.to_id == link.to_id) {
            return false;
        }
        edges.push(link);
        true
    }

    /// Remove the directed edge `from -> to`. Returns whether it existed.
    pub fn remove(&mut self, from: &str, to: &str) -> bool {
        let Some(edges) = self.nodes.get_mut(from) else {
            return false;
        };

        let before = edges.len();
        edges.retain(|e| e.to_id != to);
        let removed = edges.len() != before;

        if edges.is_empty() {
            self.nodes.remove(from);
        }
        removed
    }

    /// Outgoing edges of `id`, or an empty slice.
    pub fn links(&self, id: &str) -> &[RelationshipLink] {
        self.nodes.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes with at least one outgoing edge.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Directed edges, mirrors included.
    pub fn link_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Parse an index document.
pub fn parse_index(source_name: &str, bytes: &[u8]) -> RecordOutcome<AdjacencyIndex> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return RecordOutcome::Accepted(AdjacencyIndex::default());
    }
    match serde_json::from_slice(bytes) {
        Ok(index) => RecordOutcome::Accepted(index),
        Err(e) => RecordOutcome::Tolerated(BraidError::malformed(source_name, None, e.to_string())),
    }
}

/// Read the index at `path`.
///
/// A missing file is an empty graph. A corrupt file is reported and also
/// treated as empty.
pub async fn load_index(path: &Path, diagnostics: &dyn DiagnosticsSink) -> BraidResult<AdjacencyIndex> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AdjacencyIndex::default()),
        Err(e) => return Err(e.into()),
    };

    let source_name = path.display().to_string();
    Ok(parse_index(&source_name, &bytes)
        .accept_or_report(diagnostics)
        .unwrap_or_default())
}

/// Write the index to `path` via a temporary file and rename.
pub async fn persist_index(path: &Path, index: &AdjacencyIndex) -> BraidResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(index)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
