//! Core types for braid.

mod candidate;
mod embedding;
mod link;

pub use candidate::*;
pub use embedding::*;
pub use link::*;
