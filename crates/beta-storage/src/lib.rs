//! Object storage for beta extension archives.
//!
//! The [`Uploader`] submits each packaged archive under the beta channel
//! prefix and returns immediately; outcomes are collected in an
//! [`UploadSet`] so the caller decides when to wait for them.

pub mod config;
pub mod error;
pub mod s3;
pub mod store;
pub mod uploader;

pub use config::{StorageBackend, StorageConfig};
pub use error::{Error, Result};
pub use s3::S3ObjectStore;
pub use store::{LocalObjectStore, ObjectStore};
pub use uploader::{UploadOutcome, UploadSet, Uploader};

use std::sync::Arc;

/// Construct the store selected by `config.backend`.
///
/// The store is created once per run and shared by every upload.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::S3 => Ok(Arc::new(S3ObjectStore::connect(config).await)),
        StorageBackend::Local => {
            let dir = config.local_dir.clone().ok_or(Error::MissingLocalDir)?;
            Ok(Arc::new(LocalObjectStore::new(dir)))
        }
    }
}
