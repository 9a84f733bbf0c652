//! Error types for beta-storage

use std::path::PathBuf;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while uploading archives
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The local archive could not be read
    #[error("cannot read archive {path}: {message}")]
    ReadArchive { path: PathBuf, message: String },

    /// The remote store rejected or failed the request
    #[error("put {key} to bucket '{bucket}' failed: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },

    /// I/O error in the local mirror store
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The upload task panicked or was cancelled
    #[error("upload task for {key} did not complete: {message}")]
    Task { key: String, message: String },

    /// `backend = "local"` without a target directory
    #[error("local storage backend requires `local_dir`")]
    MissingLocalDir,
}
