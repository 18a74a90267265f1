//! Configuration system for braid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BraidError, BraidResult};
use crate::retrieval::RetrievalConfig;

/// Where and how the stores persist their data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; embeddings and graph live in subdirectories.
    pub data_dir: PathBuf,
    /// Embedding dimension. Records of any other length are excluded from search.
    pub dimension: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let braid_dir = dirs::home_dir()
            .map(|h| h.join(".braid"))
            .unwrap_or_else(|| PathBuf::from(".braid"));

        Self {
            data_dir: braid_dir,
            dimension: 1536,
        }
    }
}

impl StorageConfig {
    /// Directory holding one `partition-<n>.jsonl` file per partition.
    pub fn embeddings_dir(&self) -> PathBuf {
        self.data_dir.join("embeddings")
    }

    /// Path of the adjacency index document.
    pub fn graph_index_path(&self) -> PathBuf {
        self.data_dir.join("graph").join("links.json")
    }
}

/// Main braid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BraidConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Retrieval scoring configuration.
    pub retrieval: RetrievalConfig,
}

impl BraidConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> BraidResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| BraidError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| BraidError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| BraidError::Configuration(e.to_string()))?,
            _ => {
                return Err(BraidError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.warn_if_invalid();
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("BRAID_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(dimension) = env_parse("BRAID_DIMENSION") {
            config.storage.dimension = dimension;
        }
        if let Some(hops) = env_parse("BRAID_MAX_HOPS") {
            config.retrieval.max_hops = hops;
        }
        if let Some(strength) = env_parse("BRAID_MIN_LINK_STRENGTH") {
            config.retrieval.min_link_strength = strength;
        }
        if let Some(weight) = env_parse("BRAID_CHAIN_WEIGHT") {
            config.retrieval.chain_weight = weight;
        }
        if let Some(hours) = env_parse("BRAID_RECENCY_HALF_LIFE_HOURS") {
            config.retrieval.recency_half_life_hours = hours;
        }
        if let Ok(flag) = std::env::var("BRAID_RECENCY_BOOST") {
            config.retrieval.recency_boost =
                !matches!(flag.to_lowercase().as_str(), "false" | "0" | "no");
        }

        config.warn_if_invalid();
        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> BraidConfigBuilder {
        BraidConfigBuilder::default()
    }

    fn warn_if_invalid(&self) {
        if let Err(e) = self.retrieval.validate() {
            tracing::warn!("{}", e);
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

/// Builder for BraidConfig.
#[derive(Default)]
pub struct BraidConfigBuilder {
    config: BraidConfig,
}

impl BraidConfigBuilder {
    /// Set the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage.data_dir = dir.into();
        self
    }

    /// Set the embedding dimension.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.config.storage.dimension = dimension;
        self
    }

    /// Set retrieval configuration.
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.config.retrieval = retrieval;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> BraidConfig {
        self.config
    }
}
