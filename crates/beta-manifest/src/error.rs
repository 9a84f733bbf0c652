//! Error types for beta-manifest

use std::path::PathBuf;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the record or patching a manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error(transparent)]
    Fs(#[from] beta_fs::Error),

    /// The record is not a JSON array of strings
    #[error("failed to parse published package record: {0}")]
    RecordParse(#[from] serde_json::Error),

    /// A record entry does not have the `name:version` shape
    #[error("invalid published package entry '{entry}': expected \"name:version\"")]
    InvalidRecordEntry { entry: String },

    /// The manifest document is not a JSON object
    #[error("manifest at {path} is not a JSON object")]
    NotAnObject { path: PathBuf },
}
