//! Partitioned JSON Lines embedding store.
//!
//! Layout: `<dir>/partition-<n>.jsonl`, one record per line. Files are only
//! ever appended to; search reads and scores every record of the requested
//! partitions on each call.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use braid_core::diagnostics::{tracing_diagnostics, RecordOutcome, SharedDiagnostics};
use braid_core::error::{BraidError, BraidResult};
use braid_core::similarity::{normalize, similarity};
use braid_core::traits::EmbeddingStore;
use braid_core::types::{EmbeddingMatch, EmbeddingRecord};

const PARTITION_PREFIX: &str = "partition-";
const PARTITION_SUFFIX: &str = ".jsonl";

/// Embedding store backed by append-only partition files.
pub struct JsonlEmbeddingStore {
    dir: PathBuf,
    dimension: usize,
    diagnostics: SharedDiagnostics,
    write_lock: Mutex<()>,
}

impl JsonlEmbeddingStore {
    /// Open a store rooted at `dir`, reporting to `tracing`.
    pub async fn open(dir: impl Into<PathBuf>, dimension: usize) -> BraidResult<Self> {
        Self::with_diagnostics(dir, dimension, tracing_diagnostics()).await
    }

    /// Open a store with an explicit diagnostics sink.
    ///
    /// A missing directory is created and reported as `StorageUnavailable`.
    pub async fn with_diagnostics(
        dir: impl Into<PathBuf>,
        dimension: usize,
        diagnostics: SharedDiagnostics,
    ) -> BraidResult<Self> {
        let dir = dir.into();

        if !tokio::fs::try_exists(&dir).await? {
            diagnostics.report(&BraidError::storage_unavailable(
                &dir,
                "embedding directory missing, creating it",
            ));
            tokio::fs::create_dir_all(&dir).await?;
        }

        tracing::debug!(dir = %dir.display(), dimension, "Opened JSONL embedding store");

        Ok(Self {
            dir,
            dimension,
            diagnostics,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn partition_path(&self, partition: i64) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", PARTITION_PREFIX, partition, PARTITION_SUFFIX))
    }

    /// Append a prepared record to its partition.
    pub async fn save_record(&self, record: &EmbeddingRecord) -> BraidResult<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.partition_path(record.partition))
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }

    /// Partition numbers present on disk, ascending.
    pub async fn partitions(&self) -> BraidResult<Vec<i64>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.diagnostics.report(&BraidError::storage_unavailable(
                    &self.dir,
                    "embedding directory disappeared",
                ));
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut partitions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(partition) = name.to_str().and_then(parse_partition_name) {
                partitions.push(partition);
            }
        }
        partitions.sort_unstable();
        partitions.dedup();
        Ok(partitions)
    }

    async fn read_partition(&self, partition: i64) -> BraidResult<Vec<EmbeddingRecord>> {
        let path = self.partition_path(partition);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(e.into()),
            Err(e) => {
                self.diagnostics
                    .report(&BraidError::partition_unreadable(&path, e.to_string()));
                return Ok(Vec::new());
            }
        };

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let records = bytes
            .split(|b| *b == b'\n')
            .enumerate()
            .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
            .filter_map(|(i, line)| {
                self.parse_line(&source_name, i + 1, line)
                    .accept_or_report(self.diagnostics.as_ref())
            })
            .collect();

        Ok(records)
    }

    fn parse_line(
        &self,
        source_name: &str,
        line_no: usize,
        line: &[u8],
    ) -> RecordOutcome<EmbeddingRecord> {
        let record: EmbeddingRecord = match serde_json::from_slice(line) {
            Ok(record) => record,
            Err(e) => {
                return RecordOutcome::Tolerated(BraidError::malformed(
                    source_name,
                    Some(line_no),
                    e.to_string(),
                ))
            }
        };

        if record.vector.len() != self.dimension {
            return RecordOutcome::Tolerated(BraidError::dimension_mismatch(
                record.id,
                self.dimension,
                record.vector.len(),
            ));
        }

        RecordOutcome::Accepted(record)
    }
}

/// Only canonical names count: `partition-03.jsonl` would otherwise alias
/// `partition-3.jsonl`.
fn parse_partition_name(name: &str) -> Option<i64> {
    let partition: i64 = name
        .strip_prefix(PARTITION_PREFIX)?
        .strip_suffix(PARTITION_SUFFIX)?
        .parse()
        .ok()?;
    let canonical = format!("{}{}{}", PARTITION_PREFIX, partition, PARTITION_SUFFIX);
    (canonical == name).then_some(partition)
}

#[async_trait]
impl EmbeddingStore for JsonlEmbeddingStore {
    async fn save(
        &self,
        id: &str,
        vector: Vec<f32>,
        partition: i64,
        timestamp: DateTime<Utc>,
        source_id: &str,
    ) -> BraidResult<()> {
        let record =
            EmbeddingRecord::new(id, vector, timestamp, source_id).with_partition(partition);
        self.save_record(&record).await
    }

    async fn load(&self, partitions: Option<&[i64]>) -> BraidResult<Vec<EmbeddingRecord>> {
        let partitions = match partitions {
            Some(requested) => {
                let mut requested = requested.to_vec();
                requested.sort_unstable();
                requested.dedup();
                requested
            }
            None => self.partitions().await?,
        };

        let mut records = Vec::new();
        for partition in partitions {
            records.extend(self.read_partition(partition).await?);
        }
        Ok(records)
    }

    async fn search(
        &self,
        query: &[f32],
        k: usize,
        partitions: Option<&[i64]>,
    ) -> BraidResult<Vec<EmbeddingMatch>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = normalize(query);
        let records = self.load(partitions).await?;
        let scanned = records.len();

        let mut matches: Vec<EmbeddingMatch> = records
            .into_iter()
            .filter_map(|record| {
                let score = similarity(&query, &normalize(&record.vector));
                (score > 0.0).then(|| EmbeddingMatch {
                    id: record.id,
                    source_id: record.source_id,
                    score,
                    partition: record.partition,
                    timestamp: record.timestamp,
                })
            })
            .collect();

        // stable: ties keep load order
        matches.sort_by(|a, b| OrderedFloat(b.score).cmp(&OrderedFloat(a.score)));
        matches.truncate(k);

        tracing::debug!(scanned, returned = matches.len(), "Embedding search complete");
        Ok(matches)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
