//! Progress hooks for rendering a run while it happens.

use beta_manifest::PatchReport;
use beta_storage::UploadOutcome;

use crate::discovery::ExtensionInfo;
use crate::report::{PackageStatus, Summary};

/// Receives progress events from [`Publisher::run`](crate::Publisher::run).
///
/// All hooks default to no-ops.
pub trait PublishObserver: Send + Sync {
    fn started(&self) {}

    fn patch_finished(&self, _report: &PatchReport) {}

    fn installing(&self) {}

    fn packaging(&self, _index: usize, _candidate: &ExtensionInfo) {}

    fn package_finished(&self, _candidate: &ExtensionInfo, _status: &PackageStatus) {}

    fn upload_finished(&self, _outcome: &UploadOutcome) {}

    fn completed(&self, _summary: &Summary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PublishObserver for NoopObserver {}
