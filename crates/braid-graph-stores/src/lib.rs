//! braid-graph-stores - Relationship graph store implementations for braid.
//!
//! # Supported Backends
//!
//! - **Adjacency** - A single JSON adjacency document with bidirectional
//!   typed edges and bounded breadth-first chain traversal.

pub mod adjacency;

pub use adjacency::index::AdjacencyIndex;
pub use adjacency::traversal::traverse_chain;
pub use adjacency::AdjacencyGraphStore;
