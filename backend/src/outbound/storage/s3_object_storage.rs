//! S3-compatible object storage.
//!
//! Upload grants are presigned `PutObject` requests signed locally, so
//! issuing one performs no network I/O. Reads download the full body.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::{debug, info};

use crate::domain::StorageKey;
use crate::domain::ports::{ObjectStorage, ObjectStorageError, PresignedUpload};

/// Where the bucket lives.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services such as MinIO.
    pub endpoint: Option<String>,
}

/// [`ObjectStorage`] backed by one S3 bucket.
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl S3ObjectStorage {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client using the default AWS credential chain.
    pub async fn connect(settings: S3Settings) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = settings.endpoint.as_deref() {
            // Path-style addressing is required by most S3-compatible stores.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        info!(bucket = %settings.bucket, "object storage configured");
        Self::new(Client::from_conf(builder.build()), settings.bucket)
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn presign_upload(
        &self,
        key: &StorageKey,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<PresignedUpload, ObjectStorageError> {
        let config = PresigningConfig::expires_in(expires_in)
            .map_err(|err| ObjectStorageError::signing(err.to_string()))?;
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type(content_type)
            .presigned(config)
            .await
            .map_err(|err| ObjectStorageError::signing(err.to_string()))?;
        Ok(PresignedUpload {
            url: request.uri().to_owned(),
        })
    }

    async fn fetch(&self, key: &StorageKey) -> Result<Vec<u8>, ObjectStorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    ObjectStorageError::missing(key.as_str())
                } else {
                    ObjectStorageError::read(err.to_string())
                }
            })?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| ObjectStorageError::read(err.to_string()))?
            .into_bytes();
        if bytes.is_empty() {
            return Err(ObjectStorageError::missing(key.as_str()));
        }
        debug!(key = %key, size = bytes.len(), "object fetched");
        Ok(bytes.to_vec())
    }
}
