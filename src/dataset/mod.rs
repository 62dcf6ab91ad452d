// Dataset loading module
// Reads the yoga pose dataset from a local JSON file or a remote snapshot


use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// One raw record of the yoga pose dataset. All fields are optional in the
/// source data; the document builder decides the per-field defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PoseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanskrit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to fetch remote dataset: {0}")]
    Fetch(String),
}

/// Load pose records from a local JSON array file.
///
/// A missing or malformed file is reported as an error; callers are expected
/// to handle it rather than proceed with an absent dataset.
#[inline]
pub fn load_poses<P: AsRef<Path>>(path: P) -> Result<Vec<PoseRecord>, DatasetError> {
    let path = path.as_ref();
    debug!("Loading pose dataset from {}", path.display());

    let content = fs::read_to_string(path)?;
    let poses: Vec<PoseRecord> = serde_json::from_str(&content)?;

    info!("Loaded {} poses from {}", poses.len(), path.display());
    Ok(poses)
}

/// Load pose records from a remote dataset snapshot serving the same JSON
/// array format as the bundled file.
#[inline]
pub fn load_poses_from_url(url: &str) -> Result<Vec<PoseRecord>, DatasetError> {
    debug!("Fetching pose dataset from {}", url);

    let body = ureq::get(url)
        .call()
        .and_then(|mut resp| resp.body_mut().read_to_string())
        .map_err(|e| DatasetError::Fetch(e.to_string()))?;

    let poses: Vec<PoseRecord> = serde_json::from_str(&body)?;

    info!("Loaded {} poses from {}", poses.len(), url);
    Ok(poses)
}
