use proxima::{
    DistanceMetric, MetadataFilter, MetadataMap, MockEmbedder, SearchOptions, SemanticStore,
};

fn sector(value: &str) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    metadata.insert("sector".to_string(), value.into());
    metadata
}

#[test]
fn test_search_finds_same_text() {
    let mut store = SemanticStore::new(MockEmbedder::new(128), DistanceMetric::Cosine).unwrap();

    store
        .insert(1i64, "my card payment was declined", sector("billing"))
        .unwrap();
    store
        .insert(2i64, "the app crashes on startup", sector("support"))
        .unwrap();
    store
        .insert(3i64, "please cancel my subscription", sector("billing"))
        .unwrap();

    let results = store
        .search("my card payment was declined", 3, &SearchOptions::new())
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, 1i64.into());
    assert!(results[0].distance < 1e-6);
    for window in results.windows(2) {
        assert!(window[0].distance <= window[1].distance);
    }
}

#[test]
fn test_search_with_metadata_filter() {
    let mut store = SemanticStore::new(MockEmbedder::new(128), DistanceMetric::Cosine).unwrap();

    store
        .insert(1i64, "my card payment was declined", sector("billing"))
        .unwrap();
    store
        .insert(2i64, "the app crashes on startup", sector("support"))
        .unwrap();
    store
        .insert(3i64, "please cancel my subscription", sector("billing"))
        .unwrap();

    let options =
        SearchOptions::new().with_filter(MetadataFilter::new().equals("sector", "billing"));
    let results = store.search("anything at all", 10, &options).unwrap();

    assert_eq!(results.len(), 2);
    for neighbor in &results {
        assert_eq!(neighbor.metadata.get("sector").unwrap().as_str(), Some("billing"));
    }
}

#[test]
fn test_max_distance_cutoff() {
    let mut store = SemanticStore::new(MockEmbedder::new(128), DistanceMetric::Cosine).unwrap();

    store.insert(1i64, "exact match text", MetadataMap::new()).unwrap();
    store.insert(2i64, "something unrelated", MetadataMap::new()).unwrap();

    let options = SearchOptions::new().with_max_distance(1e-6);
    let results = store.search("exact match text", 10, &options).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 1i64.into());
}

#[test]
fn test_replace_document() {
    let mut store = SemanticStore::new(MockEmbedder::new(64), DistanceMetric::Cosine).unwrap();

    store.insert("msg", "first draft", MetadataMap::new()).unwrap();
    store.insert("msg", "final wording", MetadataMap::new()).unwrap();
    assert_eq!(store.len(), 1);

    let results = store
        .search("final wording", 1, &SearchOptions::new())
        .unwrap();
    assert_eq!(results[0].id, "msg".into());
    assert!(results[0].distance < 1e-6);
}

#[test]
fn test_empty_store_returns_nothing() {
    let store = SemanticStore::new(MockEmbedder::new(32), DistanceMetric::Cosine).unwrap();
    assert!(store.is_empty());

    let results = store.search("anything", 5, &SearchOptions::new()).unwrap();
    assert!(results.is_empty());
}
