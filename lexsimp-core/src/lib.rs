//! Unsupervised lexical simplification library.
//!
//! This crate replaces complex words in plain text with simpler neighbours
//! drawn from a pre-trained word-embedding space, including:
//! - Frequency-derived word complexity (`ComplexityTable`)
//! - Embedding storage and nearest-neighbour queries (`Embeddings`)
//! - Candidate filtering and Borda-count feature ranking
//! - Whole-document simplification with an audit trail of substitutions
//! - Loaders for frequency lists, stopword lists and document folders
//!
//! The loaded resources are plain immutable values: a `Simplifier` borrows
//! nothing global and can be shared across threads.

/// Core simplification model and algorithms.
pub mod model;

/// Crate-wide error type.
pub mod error;

/// I/O utilities (resource loading, output writing, path helpers).
pub mod io;

pub use error::{Result, SimplifyError};
