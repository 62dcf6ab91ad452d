// Document builder module
// Maps raw pose records into the (text, metadata) pairs sent to the store

#[cfg(test)]
mod tests;

use tracing::info;

use crate::dataset::PoseRecord;

/// A normalized document derived from one pose record: the formatted text
/// that gets embedded, plus the full original record as metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub metadata: PoseRecord,
}

/// Build one document per pose record.
///
/// Pure and total over well-formed input: missing name/description/
/// sanskrit_name render as empty strings, missing expertise_level/pose_type
/// as the literal `N/A`.
#[inline]
pub fn build_documents(poses: &[PoseRecord]) -> Vec<Document> {
    let documents: Vec<Document> = poses
        .iter()
        .map(|pose| Document {
            text: format_pose_text(pose),
            metadata: pose.clone(),
        })
        .collect();

    info!("Created {} documents", documents.len());
    documents
}

fn format_pose_text(pose: &PoseRecord) -> String {
    format!(
        "name: {}\n\
         description: {}\n\
         sanskrit_name: {}\n\
         expertise_level: {}\n\
         pose_type: {}",
        pose.name.as_deref().unwrap_or(""),
        pose.description.as_deref().unwrap_or(""),
        pose.sanskrit_name.as_deref().unwrap_or(""),
        pose.expertise_level.as_deref().unwrap_or("N/A"),
        pose.pose_type.as_deref().unwrap_or("N/A"),
    )
    .trim()
    .to_string()
}
