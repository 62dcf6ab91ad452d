use super::*;

fn full_record() -> PoseRecord {
    PoseRecord {
        name: Some("Downward Dog".to_string()),
        description: Some("A pose...".to_string()),
        sanskrit_name: Some("Adho Mukha Svanasana".to_string()),
        expertise_level: Some("Beginner".to_string()),
        pose_type: Some("Standing".to_string()),
    }
}

#[test]
fn builds_expected_text_for_full_record() {
    let documents = build_documents(&[full_record()]);
    assert_eq!(documents.len(), 1);
    assert_eq!(
        documents[0].text,
        "name: Downward Dog\n\
         description: A pose...\n\
         sanskrit_name: Adho Mukha Svanasana\n\
         expertise_level: Beginner\n\
         pose_type: Standing"
    );
}

#[test]
fn metadata_is_the_original_record() {
    let record = full_record();
    let documents = build_documents(std::slice::from_ref(&record));
    assert_eq!(documents[0].metadata, record);
}

#[test]
fn missing_fields_use_per_field_defaults() {
    let record = PoseRecord {
        name: Some("Crow Pose".to_string()),
        ..PoseRecord::default()
    };
    let documents = build_documents(&[record]);

    let text = &documents[0].text;
    assert!(text.contains("name: Crow Pose"));
    assert!(text.contains("description: \n"));
    assert!(text.contains("sanskrit_name: \n"));
    assert!(text.contains("expertise_level: N/A"));
    assert!(text.contains("pose_type: N/A"));
}

#[test]
fn text_is_non_empty_and_contains_name_when_present() {
    let records = vec![
        full_record(),
        PoseRecord {
            name: Some("Tree Pose".to_string()),
            ..PoseRecord::default()
        },
        PoseRecord::default(),
    ];

    let documents = build_documents(&records);
    assert_eq!(documents.len(), records.len());

    for (document, record) in documents.iter().zip(&records) {
        assert!(!document.text.is_empty());
        if let Some(name) = &record.name {
            assert!(document.text.contains(name));
        }
    }
}

#[test]
fn empty_input_produces_empty_output() {
    let documents = build_documents(&[]);
    assert!(documents.is_empty());
}

#[test]
fn same_length_output_for_larger_input() {
    let records: Vec<PoseRecord> = (0..50)
        .map(|i| PoseRecord {
            name: Some(format!("Pose {i}")),
            ..PoseRecord::default()
        })
        .collect();

    let documents = build_documents(&records);
    assert_eq!(documents.len(), 50);
}
