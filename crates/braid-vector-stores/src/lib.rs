//! braid-vector-stores - Embedding store implementations for braid.
//!
//! # Supported Backends
//!
//! - **JSONL** - Append-only JSON Lines files, one per time partition, with
//!   linear-scan cosine search. No external services.

mod jsonl;

pub use jsonl::JsonlEmbeddingStore;
