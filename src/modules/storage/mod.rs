//! Object storage for hazard images
//!
//! `StorageBackend` is the seam the submit flow talks to; `MinIOClient`
//! is the production implementation.

mod minio_client;

pub use minio_client::MinIOClient;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Write-once blob storage with publicly fetchable objects
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store `data` under `key`, returning the key
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    /// Remove the object stored under `key`
    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Public URL for `key`
    fn public_url(&self, key: &str) -> String;

    /// Namespace new keys are created under
    fn key_prefix(&self) -> &str;
}

/// Percent-encode every segment of an object key, keeping the `/` separators
pub fn encode_key_path(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
