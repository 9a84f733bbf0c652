//! Publisher configuration, loaded from `publish-beta.toml`.
//!
//! Every field has a default so the file is optional. Storage credentials are
//! never read from here.

use std::path::{Path, PathBuf};

use beta_storage::StorageConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default config file name at the monorepo root.
pub const CONFIG_FILENAME: &str = "publish-beta.toml";

fn default_record_path() -> PathBuf {
    PathBuf::from("scripts/publishedPackages.temp.json")
}

fn default_web_subdir() -> String {
    "web".to_string()
}

fn default_packager_program() -> String {
    "vsce".to_string()
}

fn default_packager_args() -> Vec<String> {
    vec!["package".to_string()]
}

fn default_suffix() -> String {
    "vsix".to_string()
}

fn default_install_command() -> String {
    "npm install".to_string()
}

fn default_extensions_dir() -> PathBuf {
    PathBuf::from("extensions")
}

fn default_registry_program() -> String {
    "npm".to_string()
}

fn default_registry_args() -> Vec<String> {
    vec!["view".to_string()]
}

fn default_registry_field() -> Option<String> {
    Some("version".to_string())
}

/// When the run waits for uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    /// Join every upload before reporting the summary
    #[default]
    Await,
    /// Report the summary first; upload results follow as they are drained
    Detached,
}

/// `[packager]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagerConfig {
    #[serde(default = "default_packager_program")]
    pub program: String,
    #[serde(default = "default_packager_args")]
    pub args: Vec<String>,
    /// Archive file extension
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            program: default_packager_program(),
            args: default_packager_args(),
            suffix: default_suffix(),
        }
    }
}

/// `[install]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Shell command run once from the monorepo root
    #[serde(default = "default_install_command")]
    pub command: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            command: default_install_command(),
        }
    }
}

/// `[discovery]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Directory holding one sub-directory per extension, relative to the root
    #[serde(default = "default_extensions_dir")]
    pub extensions_dir: PathBuf,
    /// Registry lookup runs `<program> <args..> <name> [field]`
    #[serde(default = "default_registry_program")]
    pub registry_program: String,
    #[serde(default = "default_registry_args")]
    pub registry_args: Vec<String>,
    #[serde(default = "default_registry_field")]
    pub registry_field: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions_dir: default_extensions_dir(),
            registry_program: default_registry_program(),
            registry_args: default_registry_args(),
            registry_field: default_registry_field(),
        }
    }
}

/// Complete publisher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Published package record, relative to the root unless absolute
    #[serde(default = "default_record_path")]
    pub record_path: PathBuf,

    /// Nested front-end project patched alongside each extension
    #[serde(default = "default_web_subdir")]
    pub web_subdir: String,

    #[serde(default)]
    pub upload_mode: UploadMode,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub packager: PackagerConfig,

    #[serde(default)]
    pub install: InstallConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            record_path: default_record_path(),
            web_subdir: default_web_subdir(),
            upload_mode: UploadMode::default(),
            storage: StorageConfig::default(),
            packager: PackagerConfig::default(),
            install: InstallConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl PublishConfig {
    /// Parse configuration from TOML content
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = beta_fs::read_text(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `explicit`, or `<root>/publish-beta.toml` when present, or defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = root.join(CONFIG_FILENAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            tracing::debug!("no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Record path resolved against the monorepo root.
    pub fn record_path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.record_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beta_storage::StorageBackend;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_release_scripts() {
        let config = PublishConfig::default();
        assert_eq!(config.record_path, PathBuf::from("scripts/publishedPackages.temp.json"));
        assert_eq!(config.web_subdir, "web");
        assert_eq!(config.packager.program, "vsce");
        assert_eq!(config.packager.args, vec!["package"]);
        assert_eq!(config.install.command, "npm install");
        assert_eq!(config.upload_mode, UploadMode::Await);
        assert_eq!(config.storage.prefix, "vscode-extensions/beta/");
    }

    #[test]
    fn test_parse_partial_file() {
        let config = PublishConfig::parse(
            r#"
upload_mode = "detached"

[storage]
backend = "local"
local_dir = "dist/beta"

[packager]
program = "npx"
args = ["vsce", "package"]
"#,
        )
        .unwrap();

        assert_eq!(config.upload_mode, UploadMode::Detached);
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.packager.args, vec!["vsce", "package"]);
        assert_eq!(config.packager.suffix, "vsix");
        assert_eq!(config.install.command, "npm install");
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = PublishConfig::discover(temp.path(), None).unwrap();
        assert_eq!(config.web_subdir, "web");
    }

    #[test]
    fn test_discover_reads_root_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "web_subdir = \"webview\"\n").unwrap();

        let config = PublishConfig::discover(temp.path(), None).unwrap();

        assert_eq!(config.web_subdir, "webview");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "upload_mode = 12").unwrap();

        let err = PublishConfig::discover(temp.path(), None).unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(PublishConfig::discover(temp.path(), Some(&missing)).is_err());
    }
}
