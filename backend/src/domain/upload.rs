//! Upload authorisation service.
//!
//! Issues presigned PUT grants under the caller's namespace. No relational
//! store is consulted and the object does not need to exist yet.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    ObjectStorage, ObjectStorageError, UploadAuthorizer, UploadGrant, UploadRequest,
};
use crate::domain::{Error, FileNameError, StorageKey, UploadFileName, UserId};

/// Default lifetime of an upload grant.
pub const DEFAULT_UPLOAD_TTL: Duration = Duration::from_secs(300);

/// Implements [`UploadAuthorizer`] over an [`ObjectStorage`] signer.
#[derive(Clone)]
pub struct UploadAuthorizationService<S> {
    storage: Arc<S>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<S> UploadAuthorizationService<S> {
    pub fn new(storage: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            ttl: DEFAULT_UPLOAD_TTL,
        }
    }

    /// Override the grant lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

fn map_file_name_error(err: FileNameError) -> Error {
    let code = match err {
        FileNameError::Empty => "missing_filename",
        FileNameError::PathSeparator => "filename_path_separator",
        FileNameError::ControlCharacter => "filename_control_character",
        FileNameError::TooLong { .. } => "filename_too_long",
    };
    let message = match err {
        FileNameError::Empty => "Missing filename or contentType".to_owned(),
        other => other.to_string(),
    };
    Error::invalid_request(message).with_details(json!({ "field": "filename", "code": code }))
}

fn map_storage_error(err: ObjectStorageError) -> Error {
    error!(error = %err, "upload grant signing failed");
    Error::internal(format!("failed to issue upload grant: {err}"))
}

#[async_trait]
impl<S> UploadAuthorizer for UploadAuthorizationService<S>
where
    S: ObjectStorage,
{
    async fn authorize_upload(
        &self,
        owner: &UserId,
        request: UploadRequest,
    ) -> Result<UploadGrant, Error> {
        let content_type = request.content_type.trim();
        if content_type.is_empty() {
            return Err(Error::invalid_request("Missing filename or contentType")
                .with_details(json!({ "field": "contentType", "code": "missing_content_type" })));
        }
        let file_name = UploadFileName::new(&request.filename).map_err(map_file_name_error)?;

        let now = self.clock.utc();
        let key = StorageKey::for_upload(owner, now.timestamp_millis(), &file_name);
        let presigned = self
            .storage
            .presign_upload(&key, content_type, self.ttl)
            .await
            .map_err(map_storage_error)?;

        let expires_at = now
            + chrono::Duration::from_std(self.ttl)
                .map_err(|err| Error::internal(format!("invalid upload ttl: {err}")))?;
        info!(user_id = %owner, key = %key, "issued upload grant");
        Ok(UploadGrant {
            url: presigned.url,
            key,
            expires_at,
        })
    }
}
