use clap::{Parser, Subcommand};
use pose_search::config::Config;
use pose_search::{PoseSearchError, Result};
use pose_search::embeddings::ollama::OllamaClient;
use pose_search::ingest::{self, DatasetSource};
use pose_search::query;
use pose_search::store::VectorStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pose-search")]
#[command(about = "Semantic similarity search over a yoga pose dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the pose dataset, embed each document and populate the vector store
    Ingest {
        /// Path to the JSON dataset file, overriding the configured dataset path
        #[arg(long)]
        file: Option<PathBuf>,
        /// Fetch the dataset from a remote snapshot URL instead of a local file
        #[arg(long, conflicts_with = "file")]
        remote: Option<String>,
    },
    /// Search stored documents by free-text prompt
    Search {
        /// The search query prompt
        #[arg(long, required = true)]
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = load_config_from(Config::config_dir_from_env())?;
    let client = OllamaClient::new(&config.ollama)?;
    let store = VectorStore::new(&config).await?;

    match cli.command {
        Commands::Ingest { file, remote } => {
            let source = resolve_source(file, remote, &config);
            let report = ingest::run(&client, &store, &source).await?;
            println!(
                "Ingested {} poses ({} documents inserted).",
                report.poses_loaded, report.documents_inserted
            );
        }
        Commands::Search { prompt } => {
            let hits = query::run(&config, &client, &store, &prompt).await?;
            for hit in &hits {
                println!("{}", hit.text);
            }
        }
    }

    Ok(())
}

fn load_config_from<P: AsRef<std::path::Path>>(config_dir: P) -> Result<Config> {
    Config::load(config_dir).map_err(|e| PoseSearchError::Config(format!("{e:#}")))
}

/// An explicit `--remote` or `--file` wins; otherwise ingest reads the
/// dataset path from the configuration.
fn resolve_source(file: Option<PathBuf>, remote: Option<String>, config: &Config) -> DatasetSource {
    match remote {
        Some(url) => DatasetSource::RemoteSnapshot(url),
        None => DatasetSource::LocalFile(file.unwrap_or_else(|| config.dataset.path.clone())),
    }
}
