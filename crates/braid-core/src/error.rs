//! Error types for braid operations.
//!
//! Errors fall into two groups. Tolerated errors (`StorageUnavailable`,
//! `MalformedRecord`, `DimensionMismatch`) never abort a call: stores report
//! them to a [`DiagnosticsSink`](crate::diagnostics::DiagnosticsSink) and carry
//! on. Everything else propagates through [`BraidResult`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for braid operations.
pub type BraidResult<T> = Result<T, BraidError>;

/// Main error type for all braid operations.
#[derive(Error, Debug)]
pub enum BraidError {
    /// Storage directory was missing (it is created on demand).
    #[error("Storage unavailable at {}: {message}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        message: String,
        code: ErrorCode,
    },

    /// A persisted record or document could not be parsed.
    #[error("Malformed record in {source_name}{}: {message}", line_suffix(*line))]
    MalformedRecord {
        source_name: String,
        line: Option<usize>,
        message: String,
        code: ErrorCode,
    },

    /// An embedding whose length differs from the configured dimension.
    #[error("Dimension mismatch for '{id}': expected {expected}, found {found}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        found: usize,
        code: ErrorCode,
    },

    /// A configuration value is out of range.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        message: String,
        code: ErrorCode,
        field: Option<String>,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn line_suffix(line: Option<usize>) -> String {
    line.map(|l| format!(" line {}", l)).unwrap_or_default()
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (STO_xxx)
    StoDirectoryMissing,
    StoPartitionUnreadable,

    // Records (REC_xxx)
    RecMalformed,
    RecDimensionMismatch,

    // Config (CFG_xxx)
    CfgOutOfRange,
    CfgUnsupportedFormat,

    // Io / serialization
    Io,
    Serialization,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StoDirectoryMissing => "STO_001",
            ErrorCode::StoPartitionUnreadable => "STO_002",
            ErrorCode::RecMalformed => "REC_001",
            ErrorCode::RecDimensionMismatch => "REC_002",
            ErrorCode::CfgOutOfRange => "CFG_001",
            ErrorCode::CfgUnsupportedFormat => "CFG_002",
            ErrorCode::Io => "IO_001",
            ErrorCode::Serialization => "SER_001",
        }
    }
}

impl BraidError {
    /// Create a storage-unavailable error for a directory.
    pub fn storage_unavailable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            message: message.into(),
            code: ErrorCode::StoDirectoryMissing,
        }
    }

    /// Create a storage-unavailable error for a partition file that could not be read.
    pub fn partition_unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            message: message.into(),
            code: ErrorCode::StoPartitionUnreadable,
        }
    }

    /// Create a malformed-record error.
    pub fn malformed(
        source_name: impl Into<String>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            source_name: source_name.into(),
            line,
            message: message.into(),
            code: ErrorCode::RecMalformed,
        }
    }

    /// Create a dimension-mismatch error.
    pub fn dimension_mismatch(id: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            id: id.into(),
            expected,
            found,
            code: ErrorCode::RecDimensionMismatch,
        }
    }

    /// Create an invalid-config error for a named field.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            code: ErrorCode::CfgOutOfRange,
            field: Some(field.into()),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::StorageUnavailable { code, .. } => *code,
            Self::MalformedRecord { code, .. } => *code,
            Self::DimensionMismatch { code, .. } => *code,
            Self::InvalidConfig { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgUnsupportedFormat,
            Self::Io(_) => ErrorCode::Io,
            Self::Serialization(_) => ErrorCode::Serialization,
        }
    }

    /// Whether this error is tolerated (reported and skipped) rather than propagated.
    pub fn is_tolerated(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable { .. } | Self::MalformedRecord { .. } | Self::DimensionMismatch { .. }
        )
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::MalformedRecord { .. } => Some("The record was skipped; inspect the file for partial writes"),
            Self::DimensionMismatch { .. } => Some("Check that the store dimension matches the embedding model"),
            Self::InvalidConfig { .. } => Some("Please check your retrieval configuration values"),
            Self::Configuration(_) => Some("Use a .toml, .json, or .yaml configuration file"),
            _ => None,
        }
    }
}
