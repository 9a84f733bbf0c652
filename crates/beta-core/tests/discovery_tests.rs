//! Workspace scanning against a fixed registry.

use std::sync::Arc;

use beta_core::{Error, ExtensionSource, StaticVersionRegistry, WorkspaceExtensionSource};
use beta_test_utils::TestMonorepo;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_discovers_sorted_extensions_with_publish_flag() {
    let repo = TestMonorepo::new();
    repo.add_extension("ext-b", "1.1.0", json!({}));
    repo.add_extension("ext-a", "1.0.0", json!({}));
    repo.add_extension("ext-c", "0.1.0", json!({}));

    let registry = StaticVersionRegistry::new()
        .with("ext-a", "1.0.0")
        .with("ext-b", "1.0.0");
    let source = WorkspaceExtensionSource::new(repo.root(), "extensions", Arc::new(registry));

    let found = source.discover().await.unwrap();
    let summary: Vec<(&str, &str, bool)> = found
        .iter()
        .map(|e| (e.name.as_str(), e.local_version.as_str(), e.should_publish))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("ext-a", "1.0.0", false),
            ("ext-b", "1.1.0", true),
            ("ext-c", "0.1.0", true),
        ]
    );
    assert_eq!(found[1].directory, repo.extension_dir("ext-b"));
}

#[tokio::test]
async fn test_skips_directories_without_manifest() {
    let repo = TestMonorepo::new();
    repo.add_extension("ext-a", "1.0.0", json!({}));
    repo.write_file("extensions/assets/readme.md", "not an extension");

    let source = WorkspaceExtensionSource::new(
        repo.root(),
        "extensions",
        Arc::new(StaticVersionRegistry::new()),
    );
    let found = source.discover().await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "ext-a");
}

#[tokio::test]
async fn test_manifest_without_version_fails_discovery() {
    let repo = TestMonorepo::new();
    repo.add_extension_manifest("ext-a", &json!({"name": "ext-a"}));

    let source = WorkspaceExtensionSource::new(
        repo.root(),
        "extensions",
        Arc::new(StaticVersionRegistry::new()),
    );

    assert!(matches!(
        source.discover().await,
        Err(Error::Discovery { .. })
    ));
}

#[tokio::test]
async fn test_missing_extensions_dir_fails_discovery() {
    let repo = TestMonorepo::new();
    let source = WorkspaceExtensionSource::new(
        repo.root(),
        "extensions",
        Arc::new(StaticVersionRegistry::new()),
    );

    assert!(matches!(
        source.discover().await,
        Err(Error::Discovery { .. })
    ));
}
