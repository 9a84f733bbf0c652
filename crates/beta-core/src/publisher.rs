//! The publish pipeline.

use std::path::Path;
use std::sync::Arc;

use beta_manifest::ManifestPatcher;
use beta_package::{CommandInstaller, DependencyInstaller, Packager, VscePackager};
use beta_storage::{ObjectStore, UploadOutcome, UploadSet, Uploader};

use crate::config::{PublishConfig, UploadMode};
use crate::discovery::{
    CommandVersionRegistry, ExtensionInfo, ExtensionSource, WorkspaceExtensionSource,
};
use crate::error::{Error, Result};
use crate::observer::PublishObserver;
use crate::report::{CandidateReport, PackageStatus, PublishReport, Summary, UploadStatus};

/// Drives discovery, patching, install, packaging and upload for one run.
pub struct Publisher {
    source: Arc<dyn ExtensionSource>,
    patcher: ManifestPatcher,
    installer: Arc<dyn DependencyInstaller>,
    packager: Arc<dyn Packager>,
    uploader: Uploader,
    web_subdir: String,
    upload_mode: UploadMode,
    dry_run: bool,
}

impl Publisher {
    /// The uploader looks for archives with the packager's suffix.
    pub fn new(
        source: Arc<dyn ExtensionSource>,
        patcher: ManifestPatcher,
        installer: Arc<dyn DependencyInstaller>,
        packager: Arc<dyn Packager>,
        uploader: Uploader,
    ) -> Self {
        let uploader = uploader.with_suffix(packager.suffix());
        Self {
            source,
            patcher,
            installer,
            packager,
            uploader,
            web_subdir: "web".to_string(),
            upload_mode: UploadMode::default(),
            dry_run: false,
        }
    }

    /// Wire up the default collaborators for a monorepo at `root`.
    pub fn from_config(root: &Path, config: &PublishConfig, store: Arc<dyn ObjectStore>) -> Self {
        let registry = CommandVersionRegistry::new(
            config.discovery.registry_program.clone(),
            config.discovery.registry_args.clone(),
            config.discovery.registry_field.clone(),
        );
        let source =
            WorkspaceExtensionSource::new(root, &config.discovery.extensions_dir, Arc::new(registry));
        let packager = VscePackager::new(
            config.packager.program.clone(),
            config.packager.args.clone(),
            config.packager.suffix.clone(),
        );
        let uploader = Uploader::new(store).with_prefix(config.storage.prefix.clone());

        Self::new(
            Arc::new(source),
            ManifestPatcher::new(config.record_path_in(root)),
            Arc::new(CommandInstaller::new(config.install.command.clone(), root)),
            Arc::new(packager),
            uploader,
        )
        .web_subdir(config.web_subdir.clone())
        .upload_mode(config.upload_mode)
    }

    pub fn web_subdir(mut self, web_subdir: impl Into<String>) -> Self {
        self.web_subdir = web_subdir.into();
        self
    }

    pub fn upload_mode(mut self, upload_mode: UploadMode) -> Self {
        self.upload_mode = upload_mode;
        self
    }

    /// Patch without writing, skip install, packaging and upload.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self.patcher = self.patcher.dry_run(dry_run);
        self
    }

    /// Run the pipeline to completion.
    ///
    /// Returns `Err` only when discovery or the dependency install fails;
    /// every other failure is recorded in the report.
    pub async fn run(&self, observer: &dyn PublishObserver) -> Result<PublishReport> {
        observer.started();

        let extensions = self.source.discover().await?;
        let discovered = extensions.len();
        let candidates: Vec<ExtensionInfo> = extensions
            .into_iter()
            .filter(|extension| extension.should_publish)
            .collect();

        tracing::info!(discovered, candidates = candidates.len(), "discovery complete");

        let mut patches = Vec::with_capacity(candidates.len() * 2);
        for candidate in &candidates {
            for directory in [
                candidate.directory.clone(),
                candidate.directory.join(&self.web_subdir),
            ] {
                let report = self.patcher.patch(&candidate.name, &directory);
                observer.patch_finished(&report);
                patches.push(report);
            }
        }

        if self.dry_run {
            tracing::info!("dry run, skipping dependency install");
        } else {
            observer.installing();
            self.install().await?;
        }

        let mut uploads = UploadSet::new();
        let mut reports = Vec::with_capacity(candidates.len());
        let mut summary = Summary::default();

        for (index, candidate) in candidates.iter().enumerate() {
            observer.packaging(index + 1, candidate);

            let package = if self.dry_run {
                PackageStatus::Skipped
            } else {
                self.package(candidate).await
            };
            observer.package_finished(candidate, &package);

            let upload = match &package {
                PackageStatus::Packaged(_) => {
                    let target = self.uploader.upload(
                        &mut uploads,
                        &candidate.name,
                        &candidate.directory,
                        &candidate.local_version,
                    );
                    UploadStatus::Pending { key: target.key }
                }
                PackageStatus::Failed(_) | PackageStatus::Skipped => UploadStatus::NotAttempted,
            };

            reports.push(CandidateReport {
                name: candidate.name.clone(),
                version: candidate.local_version.clone(),
                directory: candidate.directory.clone(),
                package,
                upload,
            });
            summary.push(&candidate.name, &candidate.local_version);
        }

        match self.upload_mode {
            UploadMode::Await => {
                let outcomes = uploads.join_all().await;
                record_uploads(&mut reports, outcomes, observer);
                observer.completed(&summary);
            }
            UploadMode::Detached => {
                observer.completed(&summary);
                let outcomes = uploads.join_all().await;
                record_uploads(&mut reports, outcomes, observer);
            }
        }

        Ok(PublishReport {
            discovered,
            patches,
            candidates: reports,
            summary,
            dry_run: self.dry_run,
        })
    }

    async fn install(&self) -> Result<()> {
        let installer = Arc::clone(&self.installer);
        tokio::task::spawn_blocking(move || installer.install())
            .await
            .map_err(|e| Error::Task {
                step: "install".to_string(),
                message: e.to_string(),
            })?
            .map_err(Error::Install)
    }

    /// Package on the blocking pool so submitted uploads keep progressing.
    async fn package(&self, candidate: &ExtensionInfo) -> PackageStatus {
        let packager = Arc::clone(&self.packager);
        let name = candidate.name.clone();
        let directory = candidate.directory.clone();
        let version = candidate.local_version.clone();

        let result =
            tokio::task::spawn_blocking(move || packager.package(&name, &directory, &version))
                .await;

        match result {
            Ok(Ok(archive)) => PackageStatus::Packaged(archive),
            Ok(Err(error)) => {
                tracing::error!(extension = %candidate.name, %error, "packaging failed, upload skipped");
                PackageStatus::Failed(error.to_string())
            }
            Err(join_error) => {
                tracing::error!(extension = %candidate.name, error = %join_error, "packaging task aborted");
                PackageStatus::Failed(join_error.to_string())
            }
        }
    }
}

fn record_uploads(
    reports: &mut [CandidateReport],
    outcomes: Vec<UploadOutcome>,
    observer: &dyn PublishObserver,
) {
    for outcome in outcomes {
        observer.upload_finished(&outcome);

        let Some(report) = reports.iter_mut().find(|r| {
            matches!(&r.upload, UploadStatus::Pending { key } if *key == outcome.target.key)
        }) else {
            continue;
        };

        report.upload = match &outcome.result {
            Ok(()) => UploadStatus::Succeeded {
                key: outcome.target.key.clone(),
            },
            Err(error) => UploadStatus::Failed {
                key: outcome.target.key.clone(),
                message: error.to_string(),
            },
        };
    }
}
