//! Per-extension manifest patching with failures captured as reports.

use std::path::{Path, PathBuf};

use crate::MANIFEST_FILENAME;
use crate::error::Result;
use crate::manifest::{DependencyChange, PackageManifest};
use crate::record::PublishedRecord;

/// What happened to one directory's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The directory does not exist; nothing was read or written.
    Skipped,
    /// The manifest was rewritten (or would be, on a dry run).
    Patched {
        manifest_path: PathBuf,
        changes: Vec<DependencyChange>,
    },
}

/// Result of patching one directory on behalf of an extension.
#[derive(Debug)]
pub struct PatchReport {
    pub extension: String,
    pub directory: PathBuf,
    pub result: Result<PatchOutcome>,
}

impl PatchReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Pins applied, empty when skipped or failed.
    pub fn changes(&self) -> &[DependencyChange] {
        match &self.result {
            Ok(PatchOutcome::Patched { changes, .. }) => changes,
            _ => &[],
        }
    }
}

/// Rewrites dependency pins from the published package record.
///
/// The record is re-read for every directory so a broken or missing record
/// is reported against each extension rather than aborting the run.
#[derive(Debug, Clone)]
pub struct ManifestPatcher {
    record_path: PathBuf,
    dry_run: bool,
}

impl ManifestPatcher {
    pub fn new(record_path: impl Into<PathBuf>) -> Self {
        Self {
            record_path: record_path.into(),
            dry_run: false,
        }
    }

    /// Compute changes without writing manifests back.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    /// Patch `<directory>/package.json` for `extension`. Never fails; errors
    /// are logged and returned inside the report.
    pub fn patch(&self, extension: &str, directory: &Path) -> PatchReport {
        let result = self.try_patch(directory);

        match &result {
            Ok(PatchOutcome::Skipped) => {
                tracing::debug!(extension, directory = %directory.display(), "directory missing, manifest skipped");
            }
            Ok(PatchOutcome::Patched { changes, .. }) => {
                for change in changes {
                    tracing::debug!(
                        extension,
                        dependency = %change.name,
                        section = %change.section,
                        from = %change.from,
                        to = %change.to,
                        "pinned beta dependency"
                    );
                }
            }
            Err(error) => {
                tracing::error!(extension, directory = %directory.display(), %error, "update beta package dependencies failed");
            }
        }

        PatchReport {
            extension: extension.to_string(),
            directory: directory.to_path_buf(),
            result,
        }
    }

    fn try_patch(&self, directory: &Path) -> Result<PatchOutcome> {
        let record = PublishedRecord::load(&self.record_path)?;

        if !directory.exists() {
            return Ok(PatchOutcome::Skipped);
        }

        let manifest_path = directory.join(MANIFEST_FILENAME);
        let mut manifest = PackageManifest::load(&manifest_path)?;
        let changes = manifest.apply(&record);

        if !self.dry_run {
            manifest.save()?;
        }

        Ok(PatchOutcome::Patched {
            manifest_path,
            changes,
        })
    }
}
