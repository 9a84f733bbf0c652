//! Error types for beta-core

use std::path::PathBuf;

/// Result type for orchestration
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop a publish run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config file exists but cannot be read or parsed
    #[error("Failed to load config at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Candidate discovery failed
    #[error("Extension discovery failed: {message}")]
    Discovery { message: String },

    /// Looking up the published version of a package failed
    #[error("Version lookup for '{name}' failed: {message}")]
    Registry { name: String, message: String },

    /// Bulk dependency install failed; nothing was packaged
    #[error("Dependency install failed: {0}")]
    Install(#[source] beta_package::Error),

    /// A blocking step panicked or was cancelled
    #[error("Task '{step}' did not complete: {message}")]
    Task { step: String, message: String },
}

impl Error {
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }
}
