use proxima::{DistanceMetric, HnswConfig, MetadataFilter, MetadataMap, VectorIndexManager};
use std::sync::Arc;
use std::thread;

#[test]
fn test_manager_insert_search_remove() {
    let manager = VectorIndexManager::new();
    manager
        .create_index("messages", 3, DistanceMetric::Cosine)
        .unwrap();

    let mut metadata = MetadataMap::new();
    metadata.insert("sector".to_string(), "billing".into());

    manager
        .insert("messages", 1i64, vec![1.0, 0.0, 0.0], metadata)
        .unwrap();
    manager
        .insert("messages", 2i64, vec![0.0, 1.0, 0.0], MetadataMap::new())
        .unwrap();

    let results = manager.search("messages", &[0.9, 0.1, 0.0], 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 1i64.into());
    assert_eq!(
        results[0].metadata.get("sector").unwrap().as_str(),
        Some("billing")
    );

    let filter = MetadataFilter::new().equals("sector", "billing");
    let results = manager
        .search_filtered("messages", &[0.0, 1.0, 0.0], 5, &filter)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 1i64.into());

    assert!(manager.remove("messages", 1i64));
    assert!(!manager.remove("messages", 1i64));
    let results = manager.search("messages", &[0.9, 0.1, 0.0], 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 2i64.into());
}

#[test]
fn test_concurrent_readers() {
    let manager = Arc::new(VectorIndexManager::new());
    manager
        .create_index("shared", 2, DistanceMetric::Euclidean)
        .unwrap();

    for i in 0..100i64 {
        manager
            .insert("shared", i, vec![i as f32, 0.0], MetadataMap::new())
            .unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let results = manager.search("shared", &[0.0, 0.0], 3).unwrap();
                assert_eq!(results.len(), 3);
                assert_eq!(results[0].id, 0i64.into());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_dump_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    let manager = VectorIndexManager::new();
    manager
        .create_index("messages", 3, DistanceMetric::Cosine)
        .unwrap();
    manager
        .create_index_with_hnsw(
            "documents",
            3,
            DistanceMetric::Euclidean,
            HnswConfig::default(),
        )
        .unwrap();

    let mut metadata = MetadataMap::new();
    metadata.insert("sector".to_string(), "finance".into());
    manager
        .insert("messages", "a", vec![1.0, 0.0, 0.0], metadata)
        .unwrap();
    manager
        .insert("messages", "b", vec![0.0, 1.0, 0.0], MetadataMap::new())
        .unwrap();
    manager
        .insert("documents", 10i64, vec![1.0, 2.0, 3.0], MetadataMap::new())
        .unwrap();

    manager.dump_all(dir.path()).unwrap();

    let restored = VectorIndexManager::new();
    restored.load_all(dir.path()).unwrap();

    let mut names = restored.list_indices();
    names.sort();
    assert_eq!(names, vec!["documents", "messages"]);

    let results = restored.search("messages", &[1.0, 0.0, 0.0], 2).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "a".into());
    assert_eq!(
        results[0].metadata.get("sector").unwrap().as_str(),
        Some("finance")
    );

    // The approximate index is rebuilt, config included
    let results = restored.search("documents", &[1.0, 2.0, 3.0], 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 10i64.into());
    assert!(results[0].distance.abs() < 1e-9);
}

#[test]
fn test_load_from_empty_directory_is_noop() {
    let dir = tempfile::tempdir().unwrap();

    let manager = VectorIndexManager::new();
    manager.load_all(dir.path()).unwrap();
    assert!(manager.list_indices().is_empty());
}
