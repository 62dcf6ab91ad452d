#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

/// Integration tests for the LanceDB store with realistic pose data
use pose_search::config::{Config, OllamaConfig, SearchConfig};
use pose_search::dataset::{PoseRecord, load_poses};
use pose_search::document::{Document, build_documents};
use pose_search::store::VectorStore;
use tempfile::TempDir;
use uuid::Uuid;

const DIMENSION: usize = 128;

fn create_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        base_dir: temp_dir.path().to_path_buf(),
        ollama: OllamaConfig {
            embedding_dimension: DIMENSION as u32,
            ..OllamaConfig::default()
        },
        search: SearchConfig { top_k: 5 },
        ..Config::default()
    };
    (config, temp_dir)
}

/// Deterministic text-derived vector so that identical texts embed
/// identically and related texts land near each other.
fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0_f32; DIMENSION];
    for (i, byte) in text.bytes().enumerate() {
        vector[i % DIMENSION] += f32::from(byte) / 255.0;
    }
    vector
}

fn bundled_documents() -> Vec<Document> {
    let poses = load_poses("data/yoga_poses.json").expect("bundled dataset should load");
    build_documents(&poses)
}

async fn populated_store(config: &Config) -> (VectorStore, Vec<Document>) {
    let store = VectorStore::new(config).await.expect("should create store");

    let documents = bundled_documents();
    let vectors: Vec<Vec<f32>> = documents.iter().map(|d| embed_text(&d.text)).collect();
    let ids: Vec<String> = documents.iter().map(|_| Uuid::new_v4().to_string()).collect();

    store
        .insert(&ids, &documents, &vectors)
        .await
        .expect("should insert documents");
    (store, documents)
}

#[tokio::test]
async fn bundled_dataset_round_trips_through_the_store() {
    let (config, _temp_dir) = create_test_config();
    let (store, documents) = populated_store(&config).await;

    assert_eq!(
        store.count().await.expect("should count rows"),
        documents.len() as u64
    );

    // Query each document by its own text; the exact match must rank first
    for document in &documents {
        let hits = store
            .search(&embed_text(&document.text), 3)
            .await
            .expect("search should succeed");

        assert!(!hits.is_empty());
        assert_eq!(hits[0].text, document.text);
        assert_eq!(hits[0].metadata, document.metadata);
        assert!(hits[0].similarity_score >= hits.last().expect("non-empty").similarity_score);
    }
}

#[tokio::test]
async fn results_are_ordered_and_truncated() {
    let (config, _temp_dir) = create_test_config();
    let (store, documents) = populated_store(&config).await;

    let query = embed_text(&documents[0].text);
    let hits = store.search(&query, 4).await.expect("search should succeed");

    assert_eq!(hits.len(), 4);
    for window in hits.windows(2) {
        assert!(
            window[0].similarity_score >= window[1].similarity_score,
            "results must be ordered by descending similarity"
        );
    }
}

#[tokio::test]
async fn metadata_fields_survive_storage() {
    let (config, _temp_dir) = create_test_config();
    let (store, documents) = populated_store(&config).await;

    let hits = store
        .search(&embed_text(&documents[0].text), documents.len())
        .await
        .expect("search should succeed");

    for hit in &hits {
        assert!(hit.metadata.name.is_some(), "bundled poses all have names");
        assert!(
            hit.text.contains(hit.metadata.name.as_deref().unwrap_or("")),
            "document text embeds the pose name"
        );
    }
}

#[tokio::test]
async fn large_append_only_corpus() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::new(&config).await.expect("should create store");

    let poses: Vec<PoseRecord> = (0..300)
        .map(|i| PoseRecord {
            name: Some(format!("Generated Pose {i}")),
            description: Some(format!(
                "Synthetic description {i} covering flexibility, strength and balance."
            )),
            expertise_level: Some("Beginner".to_string()),
            ..PoseRecord::default()
        })
        .collect();
    let documents = build_documents(&poses);
    let vectors: Vec<Vec<f32>> = documents.iter().map(|d| embed_text(&d.text)).collect();
    let ids: Vec<String> = (0..documents.len())
        .map(|_| Uuid::new_v4().to_string())
        .collect();

    store
        .insert(&ids, &documents, &vectors)
        .await
        .expect("should insert documents");
    assert_eq!(store.count().await.expect("should count rows"), 300);

    // Enough rows for index training
    store
        .create_index()
        .await
        .expect("index creation should succeed with 300 rows");

    let hits = store
        .search(&embed_text(&documents[42].text), 10)
        .await
        .expect("search should succeed after indexing");
    assert!(!hits.is_empty());
    assert!(hits.len() <= 10);
}
