//! Corpus files: valid, malformed, and duplicate ids.

use ragbench::{Corpus, Error, MetaValue};
use std::fs;
use tempfile::TempDir;

fn write_corpus(body: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("corpus.json");
    fs::write(&path, body).unwrap();
    (dir, path)
}

#[test]
fn test_loads_documents_without_metadata() {
    let (_dir, path) = write_corpus(
        r#"[
            {"id": "a", "title": "Alpha", "content": "first", "source": "wiki"},
            {"id": "b", "title": "Beta", "content": "second", "source": "issue",
             "metadata": {"score": 0.5}}
        ]"#,
    );
    let corpus = Corpus::from_path(&path).unwrap();
    assert_eq!(corpus.len(), 2);
    assert!(corpus.documents()[0].metadata.is_empty());
    assert_eq!(corpus.get("b").unwrap().metadata["score"], MetaValue::Number(0.5));
}

#[test]
fn test_duplicate_id_names_the_position() {
    let (_dir, path) = write_corpus(
        r#"[
            {"id": "a", "title": "A", "content": "", "source": "wiki"},
            {"id": "a", "title": "A2", "content": "", "source": "wiki"}
        ]"#,
    );
    let err = Corpus::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument { index: 1, .. }));
    assert!(err.to_string().contains("duplicate id 'a'"));
}

#[test]
fn test_wrong_field_type_is_invalid_document() {
    let (_dir, path) = write_corpus(
        r#"[{"id": "a", "title": 42, "content": "", "source": "wiki"}]"#,
    );
    assert!(matches!(
        Corpus::from_path(&path),
        Err(Error::InvalidDocument { index: 0, .. })
    ));
}

#[test]
fn test_not_an_array_is_json_error() {
    let (_dir, path) = write_corpus(r#"{"documents": []}"#);
    assert!(matches!(Corpus::from_path(&path), Err(Error::Json(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Corpus::from_path(dir.path().join("absent.json")),
        Err(Error::Io(_))
    ));
}
