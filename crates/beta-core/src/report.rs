//! Outcome of a publish run.

use std::path::PathBuf;

use beta_manifest::PatchReport;

/// Packaging result for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageStatus {
    Packaged(PathBuf),
    Failed(String),
    /// Dry run; the packager was not invoked
    Skipped,
}

/// Upload result for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// Packaging failed or dry run
    NotAttempted,
    /// Submitted and not yet joined
    Pending { key: String },
    Succeeded { key: String },
    Failed { key: String, message: String },
}

/// Everything that happened to one candidate after patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub name: String,
    pub version: String,
    pub directory: PathBuf,
    pub package: PackageStatus,
    pub upload: UploadStatus,
}

impl CandidateReport {
    pub fn is_success(&self) -> bool {
        matches!(self.package, PackageStatus::Packaged(_))
            && matches!(self.upload, UploadStatus::Succeeded { .. })
    }

    pub fn has_failure(&self) -> bool {
        matches!(self.package, PackageStatus::Failed(_))
            || matches!(self.upload, UploadStatus::Failed { .. })
    }
}

/// `name:version` of every candidate processed, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    entries: Vec<String>,
}

impl Summary {
    pub fn push(&mut self, name: &str, version: &str) {
        self.entries.push(format!("{name}:{version}"));
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// `Complete (count=N):`
    pub fn header(&self) -> String {
        format!("Complete (count={}):", self.count())
    }

    /// Newline-joined entries.
    pub fn body(&self) -> String {
        self.entries.join("\n")
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.header(), self.body())
    }
}

/// Full report of a run.
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Number of extensions discovered, candidates or not
    pub discovered: usize,
    pub patches: Vec<PatchReport>,
    pub candidates: Vec<CandidateReport>,
    pub summary: Summary,
    pub dry_run: bool,
}

impl PublishReport {
    pub fn patch_failures(&self) -> impl Iterator<Item = &PatchReport> {
        self.patches.iter().filter(|p| !p.is_ok())
    }

    pub fn candidate_failures(&self) -> impl Iterator<Item = &CandidateReport> {
        self.candidates.iter().filter(|c| c.has_failure())
    }

    /// Any recovered per-item failure.
    pub fn has_failures(&self) -> bool {
        self.patch_failures().next().is_some() || self.candidate_failures().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = Summary::default();
        assert_eq!(summary.header(), "Complete (count=0):");
        assert_eq!(summary.body(), "");
        assert_eq!(summary.to_string(), "Complete (count=0):\n");
    }

    #[test]
    fn test_summary_joins_entries() {
        let mut summary = Summary::default();
        summary.push("ext-a", "1.0.0");
        summary.push("ext-b", "0.2.0");
        assert_eq!(summary.header(), "Complete (count=2):");
        assert_eq!(summary.body(), "ext-a:1.0.0\next-b:0.2.0");
    }

    #[test]
    fn test_candidate_failure_flags() {
        let report = CandidateReport {
            name: "ext".into(),
            version: "1.0.0".into(),
            directory: PathBuf::from("ext"),
            package: PackageStatus::Packaged(PathBuf::from("ext/ext-1.0.0.vsix")),
            upload: UploadStatus::Failed {
                key: "k".into(),
                message: "denied".into(),
            },
        };
        assert!(report.has_failure());
        assert!(!report.is_success());
    }
}
