//! Operator-facing progress lines.

use beta_core::{ExtensionInfo, PackageStatus, PublishObserver, Summary};
use beta_manifest::PatchReport;
use beta_storage::UploadOutcome;
use colored::Colorize;

/// Prints the run to stdout as it happens.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    dry_run: bool,
}

impl ConsoleObserver {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl PublishObserver for ConsoleObserver {
    fn started(&self) {
        println!("{} Start:", "[PUBLISH BETA]".green().bold());
        if self.dry_run {
            println!("{}", "dry run: nothing will be written or uploaded".yellow());
        }
    }

    fn patch_finished(&self, report: &PatchReport) {
        match &report.result {
            Ok(_) => {
                for change in report.changes() {
                    println!(
                        "  {} {} {} → {}",
                        report.extension.cyan(),
                        change.name,
                        change.from.dimmed(),
                        change.to
                    );
                }
            }
            Err(e) => {
                println!(
                    "{} {} update beta package dependencies failed. {}",
                    "[ERROR]".red().bold(),
                    report.extension,
                    e
                );
            }
        }
    }

    fn installing(&self) {
        println!("{}", "Installing dependencies...".dimmed());
    }

    fn packaging(&self, _index: usize, candidate: &ExtensionInfo) {
        println!("--- {}@{} ---", candidate.name, candidate.local_version);
        if self.dry_run {
            return;
        }
        println!(
            "{} {}@{}",
            "[VSCE] PACKAGE:".blue().bold(),
            candidate.name,
            candidate.local_version
        );
    }

    fn package_finished(&self, candidate: &ExtensionInfo, status: &PackageStatus) {
        if let PackageStatus::Failed(message) = status {
            println!(
                "{} {} packaging failed, upload skipped. {}",
                "[ERROR]".red().bold(),
                candidate.name,
                message
            );
        }
    }

    fn upload_finished(&self, outcome: &UploadOutcome) {
        if outcome.is_success() {
            println!(
                "{} {} upload success.",
                "[PUBLISH BETA]".green().bold(),
                outcome.target.file_name
            );
        } else {
            println!(
                "{} {} upload failed.",
                "[ERROR]".red().bold(),
                outcome.target.file_name
            );
        }
    }

    fn completed(&self, summary: &Summary) {
        println!(
            "{} {}",
            "[PUBLISH EXTENSION BETA]".green().bold(),
            summary.header()
        );
        println!("{}", summary.body());
    }
}
