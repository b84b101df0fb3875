//! In-memory vector index with exact k-nearest-neighbor search
//!
//! Entries are stored in insertion order; result ties at equal distance go
//! to the earlier-inserted entry. The default mode is an exact brute-force
//! scan. An HNSW-backed approximate mode is opt-in via [`VectorIndex::with_hnsw`]
//! and affects recall only, never ordering: candidates from the graph are
//! re-ranked with the exact distance before they are returned.

use crate::vector::approx::{HnswBackend, HnswConfig};
use crate::vector::metadata::{MetadataFilter, MetadataMap};
use crate::vector::metric::DistanceMetric;
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Entry count beyond which the brute-force distance pass runs on rayon.
/// Selection stays sequential, so results are identical either way.
const PARALLEL_SCAN_MIN: usize = 8192;

/// Candidate over-fetch factor for the approximate mode. Stale points and
/// filtered-out entries come out of this margin.
const CANDIDATE_OVERSAMPLE: usize = 4;

/// Vector index errors
#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(usize),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type VectorResult<T> = Result<T, VectorError>;

/// Opaque entry identifier, unique within one index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryId {
    Int(i64),
    Str(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Int(i) => write!(f, "{}", i),
            EntryId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntryId {
    fn from(i: i64) -> Self {
        EntryId::Int(i)
    }
}

impl From<i32> for EntryId {
    fn from(i: i32) -> Self {
        EntryId::Int(i as i64)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId::Str(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        EntryId::Str(s)
    }
}

/// One query result: an entry id with its exact distance to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: EntryId,
    pub distance: f64,
    pub metadata: MetadataMap,
}

/// Serializable image of an index, entries in insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub hnsw: Option<HnswConfig>,
    pub entries: Vec<SnapshotEntry>,
}

/// One entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: EntryId,
    pub vector: Vec<f32>,
    pub metadata: MetadataMap,
}

#[derive(Debug)]
struct StoredEntry {
    vector: Vec<f32>,
    metadata: MetadataMap,
    /// Latest HNSW point for this entry; None in exact mode. Candidates
    /// whose point disagrees are stale and get dropped during re-ranking.
    point: Option<usize>,
}

type EntryMap = IndexMap<EntryId, StoredEntry, FxBuildHasher>;

/// Mutable set of embeddings answering k-nearest-neighbor queries
///
/// Mutation takes `&mut self` and queries take `&self`, so a bare index is
/// race-free by construction. For shared use across threads, wrap it in a
/// readers-writer lock as [`VectorIndexManager`](crate::vector::VectorIndexManager)
/// does: concurrent queries proceed in parallel, a mutation holds exclusive
/// access for its duration.
pub struct VectorIndex {
    dimension: usize,
    metric: DistanceMetric,
    entries: EntryMap,
    hnsw: Option<HnswBackend>,
}

impl fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorIndex")
            .field("dimension", &self.dimension)
            .field("metric", &self.metric)
            .field("entries", &self.entries.len())
            .field("approximate", &self.hnsw.is_some())
            .finish()
    }
}

impl VectorIndex {
    /// Create an empty exact-mode index
    pub fn new(dimension: usize, metric: DistanceMetric) -> VectorResult<Self> {
        if dimension == 0 {
            return Err(VectorError::InvalidDimension(dimension));
        }

        Ok(Self {
            dimension,
            metric,
            entries: EntryMap::default(),
            hnsw: None,
        })
    }

    /// Create an empty index in the opt-in approximate (HNSW) mode
    pub fn with_hnsw(
        dimension: usize,
        metric: DistanceMetric,
        config: HnswConfig,
    ) -> VectorResult<Self> {
        let mut index = Self::new(dimension, metric)?;
        index.hnsw = Some(HnswBackend::new(metric, config));
        Ok(index)
    }

    /// Insert or replace the entry for `id`
    ///
    /// Fails with `DimensionMismatch` if the vector length disagrees with
    /// the index dimension; a failed insert leaves the index untouched.
    /// Replacing an existing id keeps its insertion rank and stores the
    /// latest vector.
    pub fn insert(&mut self, id: impl Into<EntryId>, vector: Vec<f32>) -> VectorResult<()> {
        self.insert_with_metadata(id, vector, MetadataMap::new())
    }

    /// Insert or replace the entry for `id`, with metadata
    pub fn insert_with_metadata(
        &mut self,
        id: impl Into<EntryId>,
        vector: Vec<f32>,
        metadata: MetadataMap,
    ) -> VectorResult<()> {
        if vector.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }

        let id = id.into();
        let point = self
            .hnsw
            .as_mut()
            .map(|backend| backend.insert(id.clone(), &vector));

        debug!("Inserting entry {} ({} dims)", id, vector.len());
        self.entries.insert(
            id,
            StoredEntry {
                vector,
                metadata,
                point,
            },
        );

        Ok(())
    }

    /// Delete the entry for `id` if present; returns whether one was removed
    pub fn remove(&mut self, id: impl Into<EntryId>) -> bool {
        let id = id.into();
        // shift_remove keeps the insertion order of the remaining entries
        let removed = self.entries.shift_remove(&id).is_some();
        if removed {
            debug!("Removed entry {}", id);
        }
        removed
    }

    /// The `k` entries nearest to `vector`, ascending by distance
    ///
    /// Ties at equal distance go to the earlier-inserted entry. `k == 0`
    /// returns an empty vec; fewer than `k` stored entries returns all of
    /// them. Fails with `DimensionMismatch` on a wrong query length.
    pub fn query(&self, vector: &[f32], k: usize) -> VectorResult<Vec<Neighbor>> {
        self.query_where(vector, k, |_| true)
    }

    /// As [`query`](Self::query), restricted to entries whose metadata
    /// satisfies the predicate
    pub fn query_where<F>(&self, vector: &[f32], k: usize, predicate: F) -> VectorResult<Vec<Neighbor>>
    where
        F: Fn(&MetadataMap) -> bool + Sync,
    {
        if vector.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }

        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let scored = match &self.hnsw {
            Some(backend) => self.approx_scan(backend, vector, k, &predicate),
            None => self.exact_scan(vector, &predicate),
        };

        Ok(self.materialize(Self::select_top_k(scored, k)))
    }

    /// As [`query`](Self::query), restricted to entries matching the filter
    pub fn query_filtered(
        &self,
        vector: &[f32],
        k: usize,
        filter: &MetadataFilter,
    ) -> VectorResult<Vec<Neighbor>> {
        self.query_where(vector, k, |metadata| filter.matches(metadata))
    }

    /// Current entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get metric
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Serializable image of this index, entries in insertion order
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            dimension: self.dimension,
            metric: self.metric,
            hnsw: self.hnsw.as_ref().map(|backend| backend.config().clone()),
            entries: self
                .entries
                .iter()
                .map(|(id, entry)| SnapshotEntry {
                    id: id.clone(),
                    vector: entry.vector.clone(),
                    metadata: entry.metadata.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild an index from a snapshot, including the HNSW graph when the
    /// snapshot was taken in approximate mode
    pub fn from_snapshot(snapshot: IndexSnapshot) -> VectorResult<Self> {
        let mut index = match snapshot.hnsw {
            Some(config) => Self::with_hnsw(snapshot.dimension, snapshot.metric, config)?,
            None => Self::new(snapshot.dimension, snapshot.metric)?,
        };

        for entry in snapshot.entries {
            index.insert_with_metadata(entry.id, entry.vector, entry.metadata)?;
        }

        Ok(index)
    }

    /// Distance pass over every eligible entry. Parallelized above
    /// `PARALLEL_SCAN_MIN`; the output order never matters because
    /// selection re-sorts by (distance, rank).
    fn exact_scan<F>(&self, vector: &[f32], predicate: &F) -> Vec<(f64, usize)>
    where
        F: Fn(&MetadataMap) -> bool + Sync,
    {
        let score = |rank: usize| -> Option<(f64, usize)> {
            let (_, entry) = self.entries.get_index(rank)?;
            if !predicate(&entry.metadata) {
                return None;
            }
            Some((self.metric.eval(vector, &entry.vector), rank))
        };

        if self.entries.len() >= PARALLEL_SCAN_MIN {
            (0..self.entries.len()).into_par_iter().filter_map(score).collect()
        } else {
            (0..self.entries.len()).filter_map(score).collect()
        }
    }

    /// Candidate pass for the approximate mode: over-fetch from the graph,
    /// drop stale points and filtered entries, score the rest exactly.
    fn approx_scan<F>(
        &self,
        backend: &HnswBackend,
        vector: &[f32],
        k: usize,
        predicate: &F,
    ) -> Vec<(f64, usize)>
    where
        F: Fn(&MetadataMap) -> bool + Sync,
    {
        let fetch = k
            .saturating_mul(CANDIDATE_OVERSAMPLE)
            .max(backend.ef_search())
            .min(backend.points());

        let mut scored = Vec::new();
        for point in backend.candidates(vector, fetch) {
            let id = match backend.label(point) {
                Some(id) => id,
                None => continue,
            };
            let (rank, _, entry) = match self.entries.get_full(id) {
                Some(found) => found,
                None => continue, // removed entry
            };
            if entry.point != Some(point) {
                continue; // stale point from a replaced entry
            }
            if !predicate(&entry.metadata) {
                continue;
            }
            scored.push((self.metric.eval(vector, &entry.vector), rank));
        }

        scored
    }

    /// Keep the `k` smallest scores, sorted ascending with the rank
    /// tie-break. Partial selection first so the sort only touches `k`
    /// elements.
    fn select_top_k(mut scored: Vec<(f64, usize)>, k: usize) -> Vec<(f64, usize)> {
        let take = k.min(scored.len());
        if take == 0 {
            scored.clear();
            return scored;
        }

        if take < scored.len() {
            scored.select_nth_unstable_by(take - 1, Self::by_distance_then_rank);
            scored.truncate(take);
        }
        scored.sort_unstable_by(Self::by_distance_then_rank);
        scored
    }

    fn by_distance_then_rank(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
        a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1))
    }

    fn materialize(&self, scored: Vec<(f64, usize)>) -> Vec<Neighbor> {
        scored
            .into_iter()
            .filter_map(|(distance, rank)| {
                let (id, entry) = self.entries.get_index(rank)?;
                Some(Neighbor {
                    id: id.clone(),
                    distance,
                    metadata: entry.metadata.clone(),
                })
            })
            .collect()
    }
}
