// Ingest orchestrator
// Linear pipeline: load -> build -> embed -> insert -> index


use tracing::{info, warn};
use uuid::Uuid;

use crate::{PoseSearchError, Result};
use crate::dataset::{PoseRecord, load_poses, load_poses_from_url};
use crate::document::build_documents;
use crate::embeddings::EmbeddingProvider;
use crate::store::{MIN_ROWS_FOR_INDEX, VectorStore};

/// Where `ingest` reads the pose dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    LocalFile(std::path::PathBuf),
    RemoteSnapshot(String),
}

/// Outcome of a completed ingest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub poses_loaded: usize,
    pub documents_inserted: usize,
}

/// Run the ingest pipeline once. Every step is fallible and any failure
/// aborts the run; there is no partial-state cleanup or resumption.
///
/// Identifiers are freshly generated per run, so re-running appends
/// duplicate records rather than upserting.
#[inline]
pub async fn run<E: EmbeddingProvider>(
    provider: &E,
    store: &VectorStore,
    source: &DatasetSource,
) -> Result<IngestReport> {
    let poses = load_dataset(source)?;
    info!("Loaded {} poses", poses.len());

    let documents = build_documents(&poses);
    info!(
        "Successfully created documents. Total documents: {}",
        documents.len()
    );

    let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
    let vectors = provider
        .embed_batch(&texts)
        .map_err(|e| PoseSearchError::Embedding(format!("{e:#}")))?;

    let ids = generate_ids(documents.len());

    store.insert(&ids, &documents, &vectors).await?;
    info!("Added {} documents to the vector store", documents.len());

    if store.count().await? >= MIN_ROWS_FOR_INDEX as u64 {
        store.create_index().await?;
    } else {
        warn!(
            "Skipping vector index creation: fewer than {} rows, search falls back to a full scan",
            MIN_ROWS_FOR_INDEX
        );
    }

    Ok(IngestReport {
        poses_loaded: poses.len(),
        documents_inserted: documents.len(),
    })
}

fn load_dataset(source: &DatasetSource) -> Result<Vec<PoseRecord>> {
    let poses = match source {
        DatasetSource::LocalFile(path) => load_poses(path)?,
        DatasetSource::RemoteSnapshot(url) => load_poses_from_url(url)?,
    };
    Ok(poses)
}

/// One fresh unique identifier per document.
pub(crate) fn generate_ids(count: usize) -> Vec<String> {
    (0..count).map(|_| Uuid::new_v4().to_string()).collect()
}
