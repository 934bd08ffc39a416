//! Top-level module for the simplification system.
//!
//! This module provides the lexical simplification pipeline, including:
//! - Frequency-based word complexity (`ComplexityTable`)
//! - Embedding storage and neighbour search (`Embeddings`)
//! - Candidate filtering against a target word (`candidates`)
//! - Borda-count rank aggregation (`ranking`)
//! - Punctuation-preserving token handling (`token`)
//! - Simplification options (`SimplifierConfig`)
//! - The document-level interface (`Simplifier`)

/// Per-word complexity scores derived from corpus frequencies.
pub mod complexity;

/// Embedding store contract and its in-memory implementation.
///
/// Supports text loading, a postcard binary cache and dot-product
/// nearest-neighbour queries.
pub mod embeddings;

/// Hard filters producing the simpler candidate set for one target.
pub mod candidates;

/// Feature computation and Borda-count ranking of candidates.
pub mod ranking;

/// Validated simplification options.
pub mod config;

/// Case-insensitive stopword set.
pub mod stopwords;

/// Leading/trailing punctuation handling and casing heuristics.
pub mod token;

/// High-level interface simplifying whole documents.
pub mod simplifier;
