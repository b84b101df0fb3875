//! Semantic store: text in, ranked neighbors out
//!
//! Composes an [`Embedder`] with a [`VectorIndex`]: documents are embedded
//! on insert, queries are embedded on search. This is the seam where a
//! database-backed vector search could be substituted for the in-process
//! index, as long as it preserves the same ordering and tie-break contract.

use crate::embed::{EmbedError, Embedder};
use crate::vector::{
    DistanceMetric, EntryId, HnswConfig, MetadataFilter, MetadataMap, Neighbor, VectorError,
    VectorIndex,
};
use thiserror::Error;
use tracing::debug;

/// Semantic store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Vector index error
    #[error("Vector index error: {0}")]
    Index(#[from] VectorError),

    /// Embedding error
    #[error("Embedding error: {0}")]
    Embed(#[from] EmbedError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Options for a semantic search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Restrict results to entries matching this filter
    pub filter: Option<MetadataFilter>,
    /// Drop results farther than this distance from the query
    pub max_distance: Option<f64>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: MetadataFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }
}

/// Text documents indexed by semantic similarity
pub struct SemanticStore<E: Embedder> {
    embedder: E,
    index: VectorIndex,
}

impl<E: Embedder> SemanticStore<E> {
    /// Create a store whose index dimension comes from the embedder
    pub fn new(embedder: E, metric: DistanceMetric) -> StoreResult<Self> {
        let index = VectorIndex::new(embedder.dimension(), metric)?;
        Ok(Self { embedder, index })
    }

    /// Create a store with the index in the opt-in approximate mode
    pub fn with_hnsw(
        embedder: E,
        metric: DistanceMetric,
        config: HnswConfig,
    ) -> StoreResult<Self> {
        let index = VectorIndex::with_hnsw(embedder.dimension(), metric, config)?;
        Ok(Self { embedder, index })
    }

    /// Embed a document and insert or replace it under `id`
    pub fn insert(
        &mut self,
        id: impl Into<EntryId>,
        text: &str,
        metadata: MetadataMap,
    ) -> StoreResult<()> {
        let vector = self.embedder.embed(text)?;
        self.index.insert_with_metadata(id, vector, metadata)?;
        Ok(())
    }

    /// Remove a document; returns whether one was removed
    pub fn remove(&mut self, id: impl Into<EntryId>) -> bool {
        self.index.remove(id)
    }

    /// Embed the query text and return its nearest documents
    pub fn search(
        &self,
        text: &str,
        k: usize,
        options: &SearchOptions,
    ) -> StoreResult<Vec<Neighbor>> {
        let query = self.embedder.embed(text)?;

        let mut results = match &options.filter {
            Some(filter) => self.index.query_filtered(&query, k, filter)?,
            None => self.index.query(&query, k)?,
        };

        if let Some(max_distance) = options.max_distance {
            results.retain(|neighbor| neighbor.distance <= max_distance);
        }

        debug!("Semantic search returned {} results", results.len());
        Ok(results)
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Direct access to the underlying index, e.g. for raw vector queries
    /// or snapshots
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}
