pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use s3::S3UrlSigner;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Invalid presigning configuration: {0}")]
    Config(String),

    #[error("Failed to sign URL for '{key}': {message}")]
    Presign { key: String, message: String },
}

/// Maps a stored object key to a time-limited access URL.
#[async_trait]
pub trait BlobUrlSigner: Send + Sync {
    async fn signed_url(&self, key: &str) -> Result<String, SignerError>;
}
