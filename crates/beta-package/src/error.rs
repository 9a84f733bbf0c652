use std::path::PathBuf;

/// Errors raised by packaging and installation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tool could not be started at all.
    #[error("failed to run '{program}' in {dir}: {source}")]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The packaging command exited unsuccessfully.
    #[error("packaging '{extension}' failed (exit code {}); check the output above", display_code(*exit_code))]
    CommandFailed {
        extension: String,
        exit_code: Option<i32>,
    },

    /// The packaging command succeeded but the expected archive is absent.
    #[error("packaging '{extension}' produced no archive at {path}")]
    ArchiveMissing { extension: String, path: PathBuf },

    /// The dependency install command exited unsuccessfully.
    #[error("dependency install '{command}' failed (exit code {}); check the output above", display_code(*exit_code))]
    InstallFailed {
        command: String,
        exit_code: Option<i32>,
    },

    /// A required binary is not on PATH.
    #[error("'{tool}' not found on PATH{}", hint.as_deref().unwrap_or(""))]
    BinaryNotFound { tool: String, hint: Option<String> },
}

fn display_code(code: Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

pub type Result<T> = std::result::Result<T, Error>;
