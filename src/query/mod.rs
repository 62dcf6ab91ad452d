// Query orchestrator
// Embeds a free-text prompt and returns the top-k stored documents


use tracing::info;

use crate::{PoseSearchError, Result};
use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::store::{SearchHit, VectorStore};

/// Run one similarity search: embed the prompt, query the store with the
/// configured `top_k`, and return the hits best match first.
#[inline]
pub async fn run<E: EmbeddingProvider>(
    config: &Config,
    provider: &E,
    store: &VectorStore,
    prompt: &str,
) -> Result<Vec<SearchHit>> {
    info!("Now executing query: {}", prompt);

    let query_vector = provider
        .embed(prompt)
        .map_err(|e| PoseSearchError::Embedding(format!("{e:#}")))?;
    let hits = store.search(&query_vector, config.search.top_k).await?;

    info!("Query returned {} results", hits.len());
    Ok(hits)
}
