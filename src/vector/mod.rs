//! Vector similarity index
//!
//! This module provides the core nearest-neighbor engine: exact brute-force
//! search by default, an opt-in HNSW approximate mode, metadata filtering,
//! and a manager for named indexes with snapshot persistence.

pub mod approx;
pub mod index;
pub mod manager;
pub mod metadata;
pub mod metric;

pub use approx::HnswConfig;
pub use index::{
    EntryId, IndexSnapshot, Neighbor, SnapshotEntry, VectorError, VectorIndex, VectorResult,
};
pub use manager::VectorIndexManager;
pub use metadata::{MetadataFilter, MetadataMap, MetadataValue};
pub use metric::{cosine_distance, euclidean_distance, CosineDistance, DistanceMetric};
