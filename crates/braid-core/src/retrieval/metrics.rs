//! Retrieval result summaries.

use std::time::Instant;

use crate::types::{RetrievalCandidate, RetrievalMetrics};

/// Summarise a result list.
///
/// Averages are taken over all results, so graph-only candidates pull the
/// average vector score down. Throughput is zero when no time has elapsed.
pub fn get_metrics(results: &[RetrievalCandidate], start: Instant) -> RetrievalMetrics {
    let elapsed = start.elapsed();
    let total = results.len();

    let avg = |f: fn(&RetrievalCandidate) -> f32| -> f32 {
        if total == 0 {
            0.0
        } else {
            results.iter().map(f).sum::<f32>() / total as f32
        }
    };

    let secs = elapsed.as_secs_f64();

    RetrievalMetrics {
        total_results: total,
        vector_results: results.iter().filter(|c| c.has_vector_support()).count(),
        chain_results: results.iter().filter(|c| c.has_chain_support()).count(),
        avg_vector_score: avg(|c| c.vector_score),
        avg_chain_score: avg(|c| c.chain_score),
        avg_recency_score: avg(|c| c.recency_score),
        avg_hybrid_score: avg(|c| c.hybrid_score),
        elapsed_ms: secs * 1000.0,
        results_per_second: if secs > 0.0 { total as f64 / secs } else { 0.0 },
    }
}
