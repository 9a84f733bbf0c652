//! S3-compatible remote store (works against OSS, MinIO and AWS).

use std::path::Path;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{
    Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::store::ObjectStore;

const CREDENTIALS_PROVIDER: &str = "publish-beta-env";

/// Client for one bucket on an S3-compatible endpoint.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3ObjectStore {
    /// Build a client from explicit configuration.
    ///
    /// Explicit credentials are used when both halves are present; otherwise
    /// the default provider chain applies and a missing key surfaces on the
    /// first request.
    pub async fn connect(config: &StorageConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        let client = Client::new(&sdk_config);

        tracing::debug!(bucket = %config.bucket, endpoint = %config.endpoint_url(), "storage client configured");

        Self {
            client,
            bucket: config.bucket.clone(),
            endpoint: config.endpoint_url(),
        }
    }
}

/// Shared SDK settings for an S3-compatible endpoint.
///
/// Checksums are only computed when an operation requires them; OSS rejects
/// aws-chunked bodies with trailing checksums.
async fn load_sdk_config(config: &StorageConfig) -> SdkConfig {
    let timeouts = TimeoutConfig::builder()
        .operation_timeout(config.timeout())
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(config.endpoint_url())
        .timeout_config(timeouts)
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired);

    if let (Some(id), Some(secret)) = (&config.access_key_id, &config.access_key_secret) {
        loader = loader.credentials_provider(Credentials::new(
            id.clone(),
            secret.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        ));
    } else {
        tracing::warn!("storage credentials not set; relying on the default provider chain");
    }

    loader.load().await
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, source: &Path) -> Result<()> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| Error::ReadArchive {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type("application/zip")
            .send()
            .await
            .map_err(|e| Error::Put {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }

    fn location(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.bucket)
    }
}
