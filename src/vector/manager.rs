//! Manager for multiple named vector indexes
//!
//! Owns every index behind a readers-writer lock: concurrent queries
//! proceed in parallel, a mutating call holds exclusive access to its index
//! for the duration. A composing service constructs one manager and passes
//! it by handle to request handlers; indexes are never rebuilt per request.

use crate::vector::approx::HnswConfig;
use crate::vector::index::{
    EntryId, IndexSnapshot, Neighbor, VectorError, VectorIndex, VectorResult,
};
use crate::vector::metadata::{MetadataFilter, MetadataMap};
use crate::vector::metric::DistanceMetric;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Manager for all vector indexes in the process
#[derive(Debug, Default)]
pub struct VectorIndexManager {
    indices: RwLock<HashMap<String, Arc<RwLock<VectorIndex>>>>,
}

impl VectorIndexManager {
    /// Create a new manager
    pub fn new() -> Self {
        Self {
            indices: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new exact-mode index; replaces any index with the same name
    pub fn create_index(
        &self,
        name: &str,
        dimension: usize,
        metric: DistanceMetric,
    ) -> VectorResult<()> {
        let index = VectorIndex::new(dimension, metric)?;
        self.register(name, index);
        Ok(())
    }

    /// Create a new index in the opt-in approximate mode
    pub fn create_index_with_hnsw(
        &self,
        name: &str,
        dimension: usize,
        metric: DistanceMetric,
        config: HnswConfig,
    ) -> VectorResult<()> {
        let index = VectorIndex::with_hnsw(dimension, metric, config)?;
        self.register(name, index);
        Ok(())
    }

    fn register(&self, name: &str, index: VectorIndex) {
        debug!("Registering vector index '{}'", name);
        let mut indices = self.indices.write().unwrap();
        indices.insert(name.to_string(), Arc::new(RwLock::new(index)));
    }

    /// Get an index handle
    pub fn get_index(&self, name: &str) -> Option<Arc<RwLock<VectorIndex>>> {
        let indices = self.indices.read().unwrap();
        indices.get(name).cloned()
    }

    /// Drop an index; returns whether one existed
    pub fn drop_index(&self, name: &str) -> bool {
        let mut indices = self.indices.write().unwrap();
        let dropped = indices.remove(name).is_some();
        if dropped {
            debug!("Dropped vector index '{}'", name);
        }
        dropped
    }

    /// List all index names
    pub fn list_indices(&self) -> Vec<String> {
        let indices = self.indices.read().unwrap();
        indices.keys().cloned().collect()
    }

    /// Insert a vector into a named index
    ///
    /// Unlike [`search`](Self::search), inserting into an unknown index is
    /// an error; silently dropping data is worse than an empty result.
    pub fn insert(
        &self,
        name: &str,
        id: impl Into<EntryId>,
        vector: Vec<f32>,
        metadata: MetadataMap,
    ) -> VectorResult<()> {
        let index_lock = self
            .get_index(name)
            .ok_or_else(|| VectorError::IndexError(format!("no such index: {}", name)))?;
        let mut index = index_lock.write().unwrap();
        index.insert_with_metadata(id, vector, metadata)
    }

    /// Remove an entry from a named index; false if the index or entry is
    /// absent
    pub fn remove(&self, name: &str, id: impl Into<EntryId>) -> bool {
        match self.get_index(name) {
            Some(index_lock) => {
                let mut index = index_lock.write().unwrap();
                index.remove(id)
            }
            None => false,
        }
    }

    /// Search a named index; an unknown name returns no results
    pub fn search(&self, name: &str, query: &[f32], k: usize) -> VectorResult<Vec<Neighbor>> {
        if let Some(index_lock) = self.get_index(name) {
            let index = index_lock.read().unwrap();
            return index.query(query, k);
        }
        Ok(Vec::new())
    }

    /// Search a named index with a metadata filter
    pub fn search_filtered(
        &self,
        name: &str,
        query: &[f32],
        k: usize,
        filter: &MetadataFilter,
    ) -> VectorResult<Vec<Neighbor>> {
        if let Some(index_lock) = self.get_index(name) {
            let index = index_lock.read().unwrap();
            return index.query_filtered(query, k, filter);
        }
        Ok(Vec::new())
    }

    /// Save all indexes to a directory: one bincode payload per index plus
    /// a JSON manifest
    pub fn dump_all(&self, path: &Path) -> VectorResult<()> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }

        let indices = self.indices.read().unwrap();
        let mut manifest = Vec::new();

        for (name, index_lock) in indices.iter() {
            let index = index_lock.read().unwrap();
            let filename = format!("{}.vectors", name);
            let file = File::create(path.join(&filename))?;
            bincode::serialize_into(BufWriter::new(file), &index.snapshot())?;

            manifest.push(serde_json::json!({
                "name": name,
                "dimension": index.dimension(),
                "metric": index.metric(),
                "entries": index.len(),
                "filename": filename,
            }));
        }

        let manifest_file = File::create(path.join("manifest.json"))?;
        serde_json::to_writer_pretty(manifest_file, &manifest)
            .map_err(|e| VectorError::IndexError(e.to_string()))?;

        info!("Dumped {} vector indexes to {:?}", manifest.len(), path);
        Ok(())
    }

    /// Load all indexes from a directory written by
    /// [`dump_all`](Self::dump_all). Missing directory or manifest is a
    /// no-op.
    pub fn load_all(&self, path: &Path) -> VectorResult<()> {
        let manifest_path = path.join("manifest.json");
        if !manifest_path.exists() {
            return Ok(());
        }

        let manifest_file = File::open(manifest_path)?;
        let manifest: Vec<serde_json::Value> = serde_json::from_reader(manifest_file)
            .map_err(|e| VectorError::IndexError(e.to_string()))?;

        let mut loaded = 0;
        for item in manifest {
            let name = item["name"]
                .as_str()
                .ok_or_else(|| VectorError::IndexError("manifest entry missing name".to_string()))?;
            let filename = item["filename"].as_str().ok_or_else(|| {
                VectorError::IndexError(format!("manifest entry '{}' missing filename", name))
            })?;

            let file = File::open(path.join(filename))?;
            let snapshot: IndexSnapshot = bincode::deserialize_from(BufReader::new(file))?;
            self.register(name, VectorIndex::from_snapshot(snapshot)?);
            loaded += 1;
        }

        info!("Loaded {} vector indexes from {:?}", loaded, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_list_drop() {
        let manager = VectorIndexManager::new();

        manager
            .create_index("messages", 3, DistanceMetric::Cosine)
            .unwrap();
        manager
            .create_index("documents", 8, DistanceMetric::Euclidean)
            .unwrap();

        let mut names = manager.list_indices();
        names.sort();
        assert_eq!(names, vec!["documents", "messages"]);

        assert!(manager.drop_index("documents"));
        assert!(!manager.drop_index("documents"));
        assert_eq!(manager.list_indices(), vec!["messages"]);
    }

    #[test]
    fn test_insert_and_search() {
        let manager = VectorIndexManager::new();
        manager
            .create_index("messages", 2, DistanceMetric::Cosine)
            .unwrap();

        manager
            .insert("messages", "a", vec![1.0, 0.0], MetadataMap::new())
            .unwrap();
        manager
            .insert("messages", "b", vec![0.0, 1.0], MetadataMap::new())
            .unwrap();

        let results = manager.search("messages", &[1.0, 0.1], 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a".into());
    }

    #[test]
    fn test_unknown_index_semantics() {
        let manager = VectorIndexManager::new();

        // Searching an unknown index is a non-error, inserting is not
        assert!(manager.search("missing", &[1.0], 5).unwrap().is_empty());
        assert!(!manager.remove("missing", "a"));
        assert!(manager
            .insert("missing", "a", vec![1.0], MetadataMap::new())
            .is_err());
    }
}
