//! Candidate discovery: which extensions have an unpublished local version.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use beta_manifest::MANIFEST_FILENAME;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{Error, Result};

/// One extension package found in the monorepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Package name, also the archive name stem
    pub name: String,
    /// Absolute extension directory
    pub directory: PathBuf,
    /// Whether the local version still needs publishing
    pub should_publish: bool,
    /// Version declared in the extension's `package.json`
    pub local_version: String,
}

/// Produces the candidate list for a run.
#[async_trait]
pub trait ExtensionSource: Send + Sync {
    async fn discover(&self) -> Result<Vec<ExtensionInfo>>;
}

/// Looks up the version a package was last published with.
#[async_trait]
pub trait VersionRegistry: Send + Sync {
    /// `Ok(None)` when the package was never published.
    async fn published_version(&self, name: &str) -> Result<Option<String>>;
}

/// Whether `local` still needs publishing given the registry's `published` version.
///
/// Versions are compared as semver when both parse; otherwise any difference
/// counts as unpublished.
pub fn is_unpublished(local: &str, published: Option<&str>) -> bool {
    let Some(published) = published else {
        return true;
    };
    match (
        semver::Version::parse(local),
        semver::Version::parse(published),
    ) {
        (Ok(local), Ok(published)) => local > published,
        _ => local != published,
    }
}

/// Asks a package manager CLI, by default `npm view <name> version`.
#[derive(Debug, Clone)]
pub struct CommandVersionRegistry {
    program: String,
    args: Vec<String>,
    field: Option<String>,
}

impl Default for CommandVersionRegistry {
    fn default() -> Self {
        Self::new("npm", vec!["view".to_string()], Some("version".to_string()))
    }
}

impl CommandVersionRegistry {
    pub fn new(program: impl Into<String>, args: Vec<String>, field: Option<String>) -> Self {
        Self {
            program: program.into(),
            args,
            field,
        }
    }
}

#[async_trait]
impl VersionRegistry for CommandVersionRegistry {
    async fn published_version(&self, name: &str) -> Result<Option<String>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(name);
        if let Some(field) = &self.field {
            cmd.arg(field);
        }

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::Registry {
                name: name.to_string(),
                message: format!("failed to run '{}': {}", self.program, e),
            })?;

        if !output.status.success() {
            tracing::debug!(package = name, code = ?output.status.code(), "registry has no published version");
            return Ok(None);
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!version.is_empty()).then_some(version))
    }
}

/// Fixed name → version map.
#[derive(Debug, Clone, Default)]
pub struct StaticVersionRegistry {
    versions: HashMap<String, String>,
}

impl StaticVersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(name.into(), version.into());
        self
    }
}

#[async_trait]
impl VersionRegistry for StaticVersionRegistry {
    async fn published_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self.versions.get(name).cloned())
    }
}

/// The identity fields of an extension manifest.
#[derive(Debug, Deserialize)]
struct PackageIdentity {
    name: String,
    version: String,
}

/// Scans `<root>/<extensions_dir>/*/package.json`.
///
/// Directories without a manifest are skipped; a manifest without `name` or
/// `version` fails discovery.
#[derive(Clone)]
pub struct WorkspaceExtensionSource {
    extensions_root: PathBuf,
    registry: Arc<dyn VersionRegistry>,
}

impl WorkspaceExtensionSource {
    pub fn new(
        root: &Path,
        extensions_dir: impl AsRef<Path>,
        registry: Arc<dyn VersionRegistry>,
    ) -> Self {
        Self {
            extensions_root: root.join(extensions_dir),
            registry,
        }
    }

    fn list_extension_dirs(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.extensions_root).map_err(|e| {
            Error::discovery(format!(
                "cannot read {}: {}",
                self.extensions_root.display(),
                e
            ))
        })?;

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}

#[async_trait]
impl ExtensionSource for WorkspaceExtensionSource {
    async fn discover(&self) -> Result<Vec<ExtensionInfo>> {
        let mut extensions = Vec::new();

        for directory in self.list_extension_dirs()? {
            let manifest_path = directory.join(MANIFEST_FILENAME);
            if !manifest_path.is_file() {
                tracing::debug!(dir = %directory.display(), "no package.json, skipping");
                continue;
            }

            let identity: PackageIdentity = beta_fs::read_json(&manifest_path)
                .map_err(|e| Error::discovery(e.to_string()))?;

            let published = self.registry.published_version(&identity.name).await?;
            let should_publish = is_unpublished(&identity.version, published.as_deref());

            tracing::debug!(
                package = %identity.name,
                local = %identity.version,
                published = ?published,
                should_publish,
                "discovered extension"
            );

            extensions.push(ExtensionInfo {
                name: identity.name,
                directory,
                should_publish,
                local_version: identity.version,
            });
        }

        Ok(extensions)
    }
}

/// A precomputed candidate list.
#[derive(Debug, Clone, Default)]
pub struct StaticExtensionSource {
    extensions: Vec<ExtensionInfo>,
}

impl StaticExtensionSource {
    pub fn new(extensions: Vec<ExtensionInfo>) -> Self {
        Self { extensions }
    }
}

#[async_trait]
impl ExtensionSource for StaticExtensionSource {
    async fn discover(&self) -> Result<Vec<ExtensionInfo>> {
        Ok(self.extensions.clone())
    }
}
