//! Driving port issuing time-boxed write grants for uploads.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, StorageKey, UserId};

/// Client request for an upload grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
}

/// Presigned write grant and the key the object will live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    pub url: String,
    pub key: StorageKey,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadAuthorizer: Send + Sync {
    async fn authorize_upload(
        &self,
        owner: &UserId,
        request: UploadRequest,
    ) -> Result<UploadGrant, Error>;
}
