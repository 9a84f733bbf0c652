use beta_fs::{Error, io};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("package.json");
    fs::write(&file_path, "original").unwrap();

    io::write_atomic(&file_path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_json_pretty_uses_two_space_indent() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("package.json");

    io::write_json_pretty(&file_path, &json!({"dependencies": {"foo": "1.2.0"}})).unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "{\n  \"dependencies\": {\n    \"foo\": \"1.2.0\"\n  }\n}");
}

#[test]
fn test_write_json_pretty_preserves_key_order() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("package.json");
    let source = r#"{"name":"zeta","version":"1.0.0","author":"alpha"}"#;
    let value: serde_json::Value = serde_json::from_str(source).unwrap();

    io::write_json_pretty(&file_path, &value).unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    let name = content.find("\"name\"").unwrap();
    let version = content.find("\"version\"").unwrap();
    let author = content.find("\"author\"").unwrap();
    assert!(name < version && version < author);
}

#[test]
fn test_read_json_round_trips_value() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("record.json");
    fs::write(&file_path, r#"["foo:1.2.0","bar:0.1.0"]"#).unwrap();

    let record: Vec<String> = io::read_json(&file_path).unwrap();

    assert_eq!(record, vec!["foo:1.2.0".to_string(), "bar:0.1.0".to_string()]);
}

#[rstest]
#[case("")]
#[case("{")]
#[case("not json")]
fn test_read_json_reports_parse_errors(#[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.json");
    fs::write(&file_path, content).unwrap();

    let err = io::read_json::<serde_json::Value>(&file_path).unwrap_err();

    match err {
        Error::JsonParse { path, .. } => assert_eq!(path, file_path),
        other => panic!("expected JsonParse, got {other:?}"),
    }
}

#[test]
fn test_read_json_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("missing.json");

    let err = io::read_json::<serde_json::Value>(&file_path).unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("missing.json"));
}
