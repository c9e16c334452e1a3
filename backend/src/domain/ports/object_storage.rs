//! Driven port for the object store holding uploaded documents.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::StorageKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object storage adapters.
    pub enum ObjectStorageError {
        /// Producing a presigned request failed.
        Signing { message: String } => "failed to presign upload: {message}",
        /// The object does not exist or carried no body.
        Missing { key: String } => "object {key} has no body",
        /// Transport or service failure while reading.
        Read { message: String } => "failed to read object: {message}",
    }
}

/// A presigned write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUpload {
    pub url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Presign a PUT of `key` with `content_type`, valid for `expires_in`.
    async fn presign_upload(
        &self,
        key: &StorageKey,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<PresignedUpload, ObjectStorageError>;

    /// Read the full object body.
    async fn fetch(&self, key: &StorageKey) -> Result<Vec<u8>, ObjectStorageError>;
}
