//! Upload behaviour against in-process stores.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use beta_storage::{
    Error, LocalObjectStore, ObjectStore, StorageBackend, StorageConfig, UploadSet, Uploader,
    open_store,
};
use tempfile::TempDir;

/// Records keys, optionally failing or delaying specific ones.
#[derive(Default)]
struct RecordingStore {
    keys: Mutex<Vec<String>>,
    fail_on: Option<String>,
    slow_on: Option<String>,
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(&self, key: &str, _source: &Path) -> beta_storage::Result<()> {
        if self.slow_on.as_deref() == Some(key) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.keys.lock().unwrap().push(key.to_string());
        if self.fail_on.as_deref() == Some(key) {
            return Err(Error::Put {
                bucket: "test".into(),
                key: key.into(),
                message: "denied".into(),
            });
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

#[tokio::test]
async fn test_target_key_uses_beta_prefix() {
    let uploader = Uploader::new(Arc::new(RecordingStore::default()));

    let target = uploader.target("ext-a", Path::new("/repo/extensions/ext-a"), "1.2.0");

    assert_eq!(target.file_name, "ext-a-1.2.0.vsix");
    assert_eq!(target.key, "vscode-extensions/beta/ext-a-1.2.0.vsix");
    assert_eq!(
        target.source,
        Path::new("/repo/extensions/ext-a").join("ext-a-1.2.0.vsix")
    );
}

#[tokio::test]
async fn test_local_store_mirrors_archive() {
    let temp = TempDir::new().unwrap();
    let ext_dir = temp.path().join("ext-a");
    std::fs::create_dir(&ext_dir).unwrap();
    std::fs::write(ext_dir.join("ext-a-1.0.0.vsix"), b"PK-archive").unwrap();
    let mirror = temp.path().join("mirror");
    let uploader = Uploader::new(Arc::new(LocalObjectStore::new(&mirror)));

    let mut set = UploadSet::new();
    uploader.upload(&mut set, "ext-a", &ext_dir, "1.0.0");
    let outcomes = set.join_all().await;

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    let uploaded = mirror.join("vscode-extensions/beta/ext-a-1.0.0.vsix");
    assert_eq!(std::fs::read(uploaded).unwrap(), b"PK-archive");
}

#[tokio::test]
async fn test_local_store_missing_archive_fails() {
    let temp = TempDir::new().unwrap();
    let uploader = Uploader::new(Arc::new(LocalObjectStore::new(temp.path().join("mirror"))));

    let mut set = UploadSet::new();
    uploader.upload(&mut set, "ext-a", temp.path(), "1.0.0");
    let outcomes = set.join_all().await;

    assert!(matches!(outcomes[0].result, Err(Error::ReadArchive { .. })));
}

#[tokio::test]
async fn test_failed_upload_does_not_affect_others() {
    let store = Arc::new(RecordingStore {
        fail_on: Some("vscode-extensions/beta/b-1.0.0.vsix".into()),
        ..RecordingStore::default()
    });
    let uploader = Uploader::new(store.clone());

    let mut set = UploadSet::new();
    for name in ["a", "b", "c"] {
        uploader.upload(&mut set, name, Path::new("."), "1.0.0");
    }
    assert_eq!(set.len(), 3);
    let outcomes = set.join_all().await;

    let results: Vec<_> = outcomes
        .iter()
        .map(|o| (o.target.extension.as_str(), o.is_success()))
        .collect();
    assert_eq!(results, vec![("a", true), ("b", false), ("c", true)]);
    assert_eq!(store.keys.lock().unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_upload_returns_before_completion() {
    let store = Arc::new(RecordingStore {
        slow_on: Some("vscode-extensions/beta/a-1.0.0.vsix".into()),
        ..RecordingStore::default()
    });
    let uploader = Uploader::new(store.clone());

    let mut set = UploadSet::new();
    uploader.upload(&mut set, "a", Path::new("."), "1.0.0");
    assert!(store.keys.lock().unwrap().is_empty());

    let outcomes = set.join_all().await;
    assert!(outcomes[0].is_success());
    assert_eq!(store.keys.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_custom_prefix_and_suffix() {
    let uploader = Uploader::new(Arc::new(RecordingStore::default()))
        .with_prefix("staging/")
        .with_suffix("zip");

    let target = uploader.target("ext", Path::new("."), "2.0.0");

    assert_eq!(target.key, "staging/ext-2.0.0.zip");
}

#[tokio::test]
async fn test_open_local_store_requires_directory() {
    let config = StorageConfig {
        backend: StorageBackend::Local,
        ..StorageConfig::default()
    };

    let result = open_store(&config).await;

    assert!(matches!(result, Err(Error::MissingLocalDir)));
}

#[tokio::test]
async fn test_open_local_store() {
    let temp = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: StorageBackend::Local,
        local_dir: Some(temp.path().to_path_buf()),
        ..StorageConfig::default()
    };

    let store = open_store(&config).await.unwrap();

    assert_eq!(store.location(), temp.path().display().to_string());
}
