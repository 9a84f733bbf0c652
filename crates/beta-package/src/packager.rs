//! Extension packaging via the `vsce` CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// File name of the archive `vsce` writes for an extension version.
///
/// # Examples
///
/// ```
/// use beta_package::archive_file_name;
///
/// assert_eq!(archive_file_name("iceworks-app", "1.0.3", "vsix"), "iceworks-app-1.0.3.vsix");
/// ```
pub fn archive_file_name(extension: &str, version: &str, suffix: &str) -> String {
    format!("{extension}-{version}.{suffix}")
}

/// Produces a distributable archive for one extension.
///
/// Implementations block until packaging finishes; at most one packaging
/// operation is in flight at a time.
pub trait Packager: Send + Sync {
    /// Package the extension in `directory` and return the archive path.
    fn package(&self, extension: &str, directory: &Path, version: &str) -> Result<PathBuf>;

    /// Archive suffix, used to derive upload keys.
    fn suffix(&self) -> &str;
}

/// Runs `vsce package` (or a configured equivalent) in the extension directory.
#[derive(Debug, Clone)]
pub struct VscePackager {
    program: String,
    args: Vec<String>,
    suffix: String,
}

impl Default for VscePackager {
    fn default() -> Self {
        Self::new("vsce", ["package"], "vsix")
    }
}

impl VscePackager {
    pub fn new<I, S>(program: impl Into<String>, args: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            suffix: suffix.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Packager for VscePackager {
    fn package(&self, extension: &str, directory: &Path, version: &str) -> Result<PathBuf> {
        tracing::debug!(
            extension,
            version,
            program = %self.program,
            dir = %directory.display(),
            "running packager"
        );

        // Inherit all streams so the tool's progress is visible live.
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(directory)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                dir: directory.to_path_buf(),
                source,
            })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                extension: extension.to_string(),
                exit_code: status.code(),
            });
        }

        let archive = directory.join(archive_file_name(extension, version, &self.suffix));
        if !archive.is_file() {
            return Err(Error::ArchiveMissing {
                extension: extension.to_string(),
                path: archive,
            });
        }

        Ok(archive)
    }

    fn suffix(&self) -> &str {
        &self.suffix
    }
}
