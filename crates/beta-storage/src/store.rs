//! The object store seam and the local mirror implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Destination for uploaded archives.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `source` under `key`.
    async fn put_object(&self, key: &str, source: &Path) -> Result<()>;

    /// Short human-readable location, used in logs.
    fn location(&self) -> String;
}

/// Mirrors uploads into a directory on disk, one file per key.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `key` is stored.
    pub fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(&self, key: &str, source: &Path) -> Result<()> {
        let target = self.path_for(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| Error::ReadArchive {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
