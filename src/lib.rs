//! Proxima Vector Search
//!
//! An embedded, in-process vector similarity index: insert embeddings under
//! opaque ids, query for the k nearest under cosine or Euclidean distance.
//!
//! # Architecture
//!
//! - `vector` — the core engine. Exact brute-force search by default, with
//!   a documented ordering contract: ascending distance, ties broken by
//!   insertion order. An HNSW approximate mode is opt-in and changes recall
//!   only, never ordering. Named indexes live behind
//!   [`VectorIndexManager`], which also snapshots them to disk.
//! - `embed` — the [`Embedder`] seam plus a deterministic [`MockEmbedder`]
//!   for development and tests.
//! - `store` — [`SemanticStore`] composes an embedder with an index: text
//!   documents in, ranked neighbors out, with metadata filters and a
//!   distance cutoff.
//!
//! # Example Usage
//!
//! ```rust
//! use proxima::{DistanceMetric, VectorIndex};
//!
//! let mut index = VectorIndex::new(3, DistanceMetric::Cosine).unwrap();
//! index.insert("a", vec![1.0, 0.0, 0.0]).unwrap();
//! index.insert("b", vec![0.0, 1.0, 0.0]).unwrap();
//!
//! let neighbors = index.query(&[1.0, 0.0, 0.1], 1).unwrap();
//! assert_eq!(neighbors[0].id, "a".into());
//! assert!(neighbors[0].distance < 0.01);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod embed;
pub mod store;
pub mod vector;

// Re-export main types for convenience
pub use vector::{
    cosine_distance, euclidean_distance, DistanceMetric, EntryId, HnswConfig, IndexSnapshot,
    MetadataFilter, MetadataMap, MetadataValue, Neighbor, SnapshotEntry, VectorError, VectorIndex,
    VectorIndexManager, VectorResult,
};

pub use embed::{
    EmbedError, EmbedResult, Embedder, MockEmbedder, DEFAULT_EMBEDDING_DIMENSION,
};

pub use store::{SearchOptions, SemanticStore, StoreError, StoreResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
