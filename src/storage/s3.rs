use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::info;

use super::{BlobUrlSigner, SignerError};
use crate::config::StorageConfig;

/// Presigns S3 `GetObject` requests for objects in one bucket
#[derive(Clone)]
pub struct S3UrlSigner {
    client: Client,
    bucket: String,
    expires_in: Duration,
}

impl S3UrlSigner {
    pub fn new(client: Client, bucket: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            expires_in,
        }
    }

    /// Build a signer from the standard AWS credential/region chain, with the
    /// region optionally pinned by configuration.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        info!(bucket = %config.bucket, expiry_secs = config.url_expiry_secs, "S3 URL signer ready");
        Self::new(
            Client::new(&shared),
            config.bucket.clone(),
            Duration::from_secs(config.url_expiry_secs),
        )
    }
}

#[async_trait]
impl BlobUrlSigner for S3UrlSigner {
    async fn signed_url(&self, key: &str) -> Result<String, SignerError> {
        let presigning = PresigningConfig::expires_in(self.expires_in)
            .map_err(|e| SignerError::Config(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| SignerError::Presign {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(request.uri().to_string())
    }
}
