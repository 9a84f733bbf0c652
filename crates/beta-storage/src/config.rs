//! Storage endpoint configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Remote prefix of the beta channel.
pub const BETA_PREFIX: &str = "vscode-extensions/beta/";

fn default_bucket() -> String {
    "iceworks".to_string()
}

fn default_endpoint() -> String {
    "oss-cn-hangzhou.aliyuncs.com".to_string()
}

fn default_region() -> String {
    "oss-cn-hangzhou".to_string()
}

fn default_prefix() -> String {
    BETA_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Which [`ObjectStore`](crate::ObjectStore) implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3-compatible remote bucket
    #[default]
    S3,
    /// Copy archives into a local directory
    Local,
}

/// Connection settings for the archive store.
///
/// Credentials are never read from config files; they are injected from the
/// process environment and not validated until the first request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Host name or URL of the endpoint; `https://` is assumed when no scheme is given.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Key prefix every archive is uploaded under.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Target directory of the local backend.
    #[serde(default)]
    pub local_dir: Option<PathBuf>,

    #[serde(skip)]
    pub access_key_id: Option<String>,

    #[serde(skip)]
    pub access_key_secret: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: default_bucket(),
            endpoint: default_endpoint(),
            region: default_region(),
            prefix: default_prefix(),
            timeout_secs: default_timeout_secs(),
            local_dir: None,
            access_key_id: None,
            access_key_secret: None,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint as a full URL.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("https://{}", self.endpoint)
        }
    }

    pub fn with_credentials(
        mut self,
        access_key_id: Option<String>,
        access_key_secret: Option<String>,
    ) -> Self {
        self.access_key_id = access_key_id;
        self.access_key_secret = access_key_secret;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_beta_bucket() {
        let config = StorageConfig::default();
        assert_eq!(config.bucket, "iceworks");
        assert_eq!(config.prefix, "vscode-extensions/beta/");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.backend, StorageBackend::S3);
    }

    #[test]
    fn test_endpoint_url_adds_scheme() {
        let config = StorageConfig::default();
        assert_eq!(config.endpoint_url(), "https://oss-cn-hangzhou.aliyuncs.com");

        let config = StorageConfig {
            endpoint: "http://localhost:9000".into(),
            ..StorageConfig::default()
        };
        assert_eq!(config.endpoint_url(), "http://localhost:9000");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StorageConfig = toml::from_str("backend = \"local\"\nlocal_dir = \"out\"").unwrap();
        assert_eq!(config.backend, StorageBackend::Local);
        assert_eq!(config.local_dir, Some(PathBuf::from("out")));
        assert_eq!(config.bucket, "iceworks");
        assert!(config.access_key_id.is_none());
    }
}
