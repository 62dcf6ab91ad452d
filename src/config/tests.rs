use super::*;
use tempfile::TempDir;

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.ollama.protocol, "http");
    assert_eq!(config.ollama.host, "localhost");
    assert_eq!(config.ollama.port, 11434);
    assert_eq!(config.ollama.model, "nomic-embed-text:latest");
    assert_eq!(config.ollama.batch_size, 16);
    assert_eq!(config.ollama.embedding_dimension, 768);
    assert_eq!(config.store.table_name, "yoga_poses");
    assert_eq!(config.search.top_k, 5);
    assert_eq!(config.dataset.path, PathBuf::from("data/yoga_poses.json"));
}

#[test]
fn config_validation() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    let mut invalid_config = config.clone();
    invalid_config.ollama.protocol = "ftp".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.port = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.model = String::new();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.batch_size = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.embedding_dimension = 32;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.store.table_name = "  ".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config;
    invalid_config.search.top_k = 0;
    assert!(invalid_config.validate().is_err());
}

#[test]
fn ollama_url_generation() {
    let config = Config::default();
    let url = config
        .ollama
        .ollama_url()
        .expect("should generate ollama_url successfully");
    assert_eq!(url.as_str(), "http://localhost:11434/");
}

#[test]
fn toml_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    let parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    assert_eq!(config, parsed_config);
}

#[test]
fn load_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config::load(temp_dir.path()).expect("should load defaults");
    assert_eq!(config.ollama, OllamaConfig::default());
    assert_eq!(config.base_dir, temp_dir.path());
}

#[test]
fn load_partial_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[search]\ntop_k = 3\n\n[ollama]\nmodel = \"all-minilm\"\n",
    )
    .expect("should write config file");

    let config = Config::load(temp_dir.path()).expect("should load config");
    assert_eq!(config.search.top_k, 3);
    assert_eq!(config.ollama.model, "all-minilm");
    // Unspecified sections fall back to defaults
    assert_eq!(config.store.table_name, "yoga_poses");
}

#[test]
fn load_invalid_file_fails() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[search]\ntop_k = 0\n",
    )
    .expect("should write config file");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn vector_database_path_under_base_dir() {
    let config = Config {
        base_dir: PathBuf::from("/tmp/pose-search"),
        ..Config::default()
    };
    assert_eq!(
        config.vector_database_path(),
        PathBuf::from("/tmp/pose-search/vectors")
    );
}
