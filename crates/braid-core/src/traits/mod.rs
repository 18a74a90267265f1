//! Core traits for braid stores.

mod graph_store;
mod vector_store;

pub use graph_store::*;
pub use vector_store::*;
