use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoseSearchError>;

#[derive(Error, Debug)]
pub enum PoseSearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] crate::dataset::DatasetError),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod config;
pub mod dataset;
pub mod document;
pub mod embeddings;
pub mod ingest;
pub mod query;
pub mod store;
