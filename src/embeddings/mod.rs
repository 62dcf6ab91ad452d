// Embedding generation module
// The provider is an injected capability so orchestrators can run with a stub

pub mod ollama;

use anyhow::Result;

/// A hosted embedding model: text in, fixed-dimensionality vector out.
///
/// Both orchestrators depend on this trait rather than a concrete client, so
/// tests can substitute a deterministic stub.
pub trait EmbeddingProvider {
    /// Embed a single text (used for the search prompt).
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of document texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimensionality every returned vector must have.
    fn dimension(&self) -> usize;
}
