//! Diagnostics sink for tolerated errors.
//!
//! Stores favour availability: a malformed line or a mismatched embedding is
//! skipped rather than failing the call. Those outcomes are still observable
//! through the sink injected at construction time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{BraidError, ErrorCode};

/// Outcome of parsing one persisted record.
#[derive(Debug)]
pub enum RecordOutcome<T> {
    /// The record parsed and may participate.
    Accepted(T),
    /// The record was skipped; the error explains why.
    Tolerated(BraidError),
}

impl<T> RecordOutcome<T> {
    /// Route a tolerated error to the sink and return the accepted value, if any.
    pub fn accept_or_report(self, sink: &dyn DiagnosticsSink) -> Option<T> {
        match self {
            Self::Accepted(value) => Some(value),
            Self::Tolerated(err) => {
                sink.report(&err);
                None
            }
        }
    }
}

/// Receives tolerated errors from stores.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticsSink: Send + Sync {
    /// Report an error that was tolerated and skipped.
    fn report(&self, error: &BraidError);
}

/// Default sink: logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn report(&self, error: &BraidError) {
        let code = error.code().as_str();
        let hint = error.suggestion().unwrap_or_default();
        match error {
            BraidError::StorageUnavailable { .. } => {
                tracing::info!(code, "{}", error);
            }
            _ if error.is_tolerated() => {
                tracing::warn!(code, hint, "{}", error);
            }
            _ => {
                tracing::error!(code, hint, "{}", error);
            }
        }
    }
}

/// Sink that keeps reported errors in memory.
///
/// Cheap to clone; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CollectingDiagnostics {
    entries: Arc<Mutex<Vec<(ErrorCode, String)>>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<(ErrorCode, String)>> {
        // a panicking reporter leaves the buffer intact
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Codes and rendered messages, in report order.
    pub fn reports(&self) -> Vec<(ErrorCode, String)> {
        self.entries().clone()
    }

    /// Rendered messages, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.entries().iter().map(|(_, m)| m.clone()).collect()
    }

    /// Error codes, in report order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.entries().iter().map(|(c, _)| *c).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for CollectingDiagnostics {
    fn report(&self, error: &BraidError) {
        self.entries().push((error.code(), error.to_string()));
    }
}

/// Shared handle used by stores.
pub type SharedDiagnostics = Arc<dyn DiagnosticsSink>;

/// The default shared sink.
pub fn tracing_diagnostics() -> SharedDiagnostics {
    Arc::new(TracingDiagnostics)
}
