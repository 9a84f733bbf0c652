//! Beta publisher CLI
//!
//! Packages every extension whose local version is unpublished and uploads the
//! archives to the beta channel.

mod cli;
mod console;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use beta_core::{PublishConfig, Publisher, UploadMode};
use beta_storage::StorageBackend;
use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use console::ConsoleObserver;
use error::{CliError, Result};

/// Exit code when `--strict` is set and some extension failed.
const EXIT_ITEM_FAILURES: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(publish(cli))
}

async fn publish(cli: Cli) -> Result<ExitCode> {
    let root = resolve_root(cli.root.clone())?;
    let config = load_config(&cli, &root)?;

    if !cli.dry_run {
        warn_missing_tools(&config);
    }

    let store = beta_storage::open_store(&config.storage).await?;
    tracing::debug!(location = %store.location(), "object store ready");

    let publisher = Publisher::from_config(&root, &config, store).dry_run(cli.dry_run);
    let report = publisher.run(&ConsoleObserver::new(cli.dry_run)).await?;

    if report.has_failures() {
        let failed = report.patch_failures().count() + report.candidate_failures().count();
        tracing::warn!(failed, "run finished with failures");
        if cli.strict {
            return Ok(ExitCode::from(EXIT_ITEM_FAILURES));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    dunce::canonicalize(&root)
        .map_err(|e| CliError::user(format!("invalid root {}: {}", root.display(), e)))
}

/// File config with flag and environment overrides applied.
///
/// Relative paths given as flags resolve against the current directory;
/// relative paths inside the config file resolve against `root`.
fn load_config(cli: &Cli, root: &Path) -> Result<PublishConfig> {
    let explicit = cli.config.as_deref().map(std::path::absolute).transpose()?;
    let mut config = PublishConfig::discover(root, explicit.as_deref())?;

    if config.storage.backend == StorageBackend::Local {
        config.storage.local_dir = config.storage.local_dir.take().map(|dir| root.join(dir));
    }

    if let Some(record) = &cli.record {
        config.record_path = std::path::absolute(record)?;
    }
    if cli.detach_uploads {
        config.upload_mode = UploadMode::Detached;
    }
    if let Some(dir) = &cli.local_store {
        config.storage.backend = StorageBackend::Local;
        config.storage.local_dir = Some(std::path::absolute(dir)?);
    }

    config.storage = config
        .storage
        .with_credentials(cli.access_key_id.clone(), cli.access_key_secret.clone());
    Ok(config)
}

fn warn_missing_tools(config: &PublishConfig) {
    let install_program = config.install.command.split_whitespace().next();
    for tool in std::iter::once(config.packager.program.as_str()).chain(install_program) {
        if let Err(e) = beta_package::check_binary_on_path(tool) {
            tracing::warn!("{}", e);
        }
    }
}
