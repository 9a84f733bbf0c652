//! Asynchronous archive upload under the beta prefix.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use beta_package::archive_file_name;
use tokio::task::JoinHandle;

use crate::config::BETA_PREFIX;
use crate::error::{Error, Result};
use crate::store::ObjectStore;

/// Identifies one submitted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub extension: String,
    pub version: String,
    /// Archive file name, e.g. `ext-1.0.0.vsix`
    pub file_name: String,
    /// Remote object key
    pub key: String,
    /// Local archive path
    pub source: PathBuf,
}

/// Final state of one upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub target: UploadTarget,
    pub result: Result<()>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Uploads submitted but not yet joined.
#[derive(Debug, Default)]
pub struct UploadSet {
    pending: Vec<(UploadTarget, JoinHandle<Result<()>>)>,
}

impl UploadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for every upload, returning outcomes in submission order.
    pub async fn join_all(self) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        for (target, handle) in self.pending {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(Error::Task {
                    key: target.key.clone(),
                    message: join_error.to_string(),
                }),
            };
            outcomes.push(UploadOutcome { target, result });
        }
        outcomes
    }
}

/// Submits archives to an [`ObjectStore`] without waiting.
#[derive(Clone)]
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    suffix: String,
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("store", &self.store.location())
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .finish()
    }
}

impl Uploader {
    /// Uploader for `.vsix` archives under the beta prefix.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            prefix: BETA_PREFIX.to_string(),
            suffix: "vsix".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Where the archive for `extension@version` lands.
    pub fn target(&self, extension: &str, directory: &Path, version: &str) -> UploadTarget {
        let file_name = archive_file_name(extension, version, &self.suffix);
        UploadTarget {
            extension: extension.to_string(),
            version: version.to_string(),
            key: format!("{}{}", self.prefix, file_name),
            source: directory.join(&file_name),
            file_name,
        }
    }

    /// Start uploading the archive for `extension@version` and return at once.
    ///
    /// Must be called from within a tokio runtime. Completion is logged by
    /// the task itself and the outcome is collected in `set`.
    pub fn upload(
        &self,
        set: &mut UploadSet,
        extension: &str,
        directory: &Path,
        version: &str,
    ) -> UploadTarget {
        let target = self.target(extension, directory, version);
        let store = Arc::clone(&self.store);
        let key = target.key.clone();
        let source = target.source.clone();
        let file_name = target.file_name.clone();

        tracing::debug!(%key, location = %store.location(), "upload submitted");

        let handle = tokio::spawn(async move {
            let result = store.put_object(&key, &source).await;
            match &result {
                Ok(()) => tracing::info!(file = %file_name, %key, "upload success"),
                Err(error) => tracing::error!(file = %file_name, %key, %error, "upload failed"),
            }
            result
        });

        set.pending.push((target.clone(), handle));
        target
    }
}
