//! HNSW candidate generation for the approximate query mode
//!
//! The graph only proposes candidates; `VectorIndex` re-ranks them with the
//! exact f64 distance and the insertion-order tie-break, so the ordering
//! contract is the same as in exact mode. hnsw_rs has no point deletion:
//! replaced and removed entries leave stale points behind, which the caller
//! filters out during re-ranking.

use crate::vector::index::EntryId;
use crate::vector::metric::{CosineDistance, DistanceMetric};
use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning parameters for the opt-in HNSW mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Capacity hint for the graph
    pub max_elements: usize,
    /// Max connections per node per layer
    pub m: usize,
    /// Candidate list size during construction
    pub ef_construction: usize,
    /// Minimum candidate list size during search
    pub ef_search: usize,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            max_elements: 100_000,
            m: 16,
            ef_construction: 200,
            ef_search: 64,
        }
    }
}

/// One graph variant per supported metric; hnsw_rs fixes the distance type
/// at construction.
enum HnswGraph {
    Cosine(Hnsw<'static, f32, CosineDistance>),
    Euclidean(Hnsw<'static, f32, DistL2>),
}

/// Wrapper around the HNSW graph plus the point-id to entry-id table
pub(crate) struct HnswBackend {
    config: HnswConfig,
    graph: HnswGraph,
    /// Point id -> entry id. Grows monotonically; stale points stay.
    labels: Vec<EntryId>,
}

// Implement Debug manually because Hnsw doesn't implement it
impl std::fmt::Debug for HnswBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HnswBackend")
            .field("config", &self.config)
            .field("points", &self.labels.len())
            .finish()
    }
}

impl HnswBackend {
    pub(crate) fn new(metric: DistanceMetric, config: HnswConfig) -> Self {
        let max_layer = 16;
        let graph = match metric {
            DistanceMetric::Cosine => HnswGraph::Cosine(Hnsw::new(
                config.m,
                config.max_elements,
                max_layer,
                config.ef_construction,
                CosineDistance,
            )),
            DistanceMetric::Euclidean => HnswGraph::Euclidean(Hnsw::new(
                config.m,
                config.max_elements,
                max_layer,
                config.ef_construction,
                DistL2::default(),
            )),
        };

        Self {
            config,
            graph,
            labels: Vec::new(),
        }
    }

    /// Insert a vector and return the point id assigned to it
    pub(crate) fn insert(&mut self, id: EntryId, vector: &Vec<f32>) -> usize {
        let point = self.labels.len();
        self.labels.push(id);

        match &self.graph {
            HnswGraph::Cosine(hnsw) => hnsw.insert((vector, point)),
            HnswGraph::Euclidean(hnsw) => hnsw.insert((vector, point)),
        }

        point
    }

    /// Fetch candidate point ids for a query, nearest-first per the graph
    pub(crate) fn candidates(&self, query: &[f32], count: usize) -> Vec<usize> {
        let count = count.min(self.labels.len());
        if count == 0 {
            return Vec::new();
        }

        let ef_search = count.max(self.config.ef_search);
        let results = match &self.graph {
            HnswGraph::Cosine(hnsw) => hnsw.search(query, count, ef_search),
            HnswGraph::Euclidean(hnsw) => hnsw.search(query, count, ef_search),
        };

        results.into_iter().map(|neighbour| neighbour.d_id).collect()
    }

    /// Entry id recorded for a point, if the point exists
    pub(crate) fn label(&self, point: usize) -> Option<&EntryId> {
        self.labels.get(point)
    }

    /// Total points ever inserted, stale ones included
    pub(crate) fn points(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn ef_search(&self) -> usize {
        self.config.ef_search
    }

    pub(crate) fn config(&self) -> &HnswConfig {
        &self.config
    }
}
