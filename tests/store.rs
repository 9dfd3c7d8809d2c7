// tests/store.rs
use std::fs;

use serde_json::{json, Value};

use rls_data::file::verify_empty_dir;
use rls_data::store::load_json;
use rls_data::Error;

#[test]
fn load_valid_json() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), r#"{"key": "value"}"#).unwrap();
    let v: Value = load_json(tmp.path()).unwrap();
    assert_eq!(v, json!({"key": "value"}));
}

#[test]
fn load_nonexistent_json() {
    let err = load_json::<Value>(std::path::Path::new("/nonexistent/path.json")).unwrap_err();
    match err {
        Error::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {other}"),
    }
}

#[test]
fn load_invalid_json() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), "invalid json").unwrap();
    assert!(matches!(load_json::<Value>(tmp.path()), Err(Error::Json { .. })));
}

#[test]
fn verify_empty_dir_accepts_empty() {
    let dir = tempfile::tempdir().unwrap();
    verify_empty_dir(dir.path()).unwrap();
}

#[test]
fn verify_empty_dir_rejects_non_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("file.txt"), "").unwrap();
    let err = verify_empty_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("must be empty"));
}

#[test]
fn verify_empty_dir_creates_missing() {
    let dir = tempfile::tempdir().unwrap();
    let new_dir = dir.path().join("new_dir").join("nested");
    verify_empty_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn verify_empty_dir_rejects_a_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert!(matches!(verify_empty_dir(file.path()), Err(Error::NotADirectory(_))));
}
