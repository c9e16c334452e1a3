//! Upload grant handler.
//!
//! ```text
//! POST /upload {"filename":"lecture.pdf","contentType":"application/pdf"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{UploadGrant, UploadRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /upload`.
///
/// Missing fields deserialise as empty strings so the service can answer
/// with its own validation message.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadBody {
    #[schema(example = "lecture.pdf")]
    pub filename: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
}

/// Presigned upload grant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Presigned PUT URL, valid for a few minutes.
    pub url: String,
    /// Storage key to pass to `/notes/generate` after uploading.
    #[schema(example = "uploads/108234567890/1717000000000-lecture.pdf")]
    pub key: String,
}

impl From<UploadGrant> for UploadResponse {
    fn from(grant: UploadGrant) -> Self {
        Self {
            url: grant.url,
            key: grant.key.as_str().to_owned(),
        }
    }
}

/// Issue a presigned upload URL inside the caller's namespace.
#[utoipa::path(
    post,
    path = "/upload",
    request_body = UploadBody,
    responses(
        (status = 200, description = "Upload grant", body = UploadResponse),
        (status = 400, description = "Missing filename or contentType", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notes"],
    operation_id = "createUpload"
)]
#[post("/upload")]
pub async fn create_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadBody>,
) -> ApiResult<web::Json<UploadResponse>> {
    let owner = session.require_user_id()?;
    let UploadBody {
        filename,
        content_type,
    } = payload.into_inner();
    let grant = state
        .uploads
        .authorize_upload(
            &owner,
            UploadRequest {
                filename,
                content_type,
            },
        )
        .await?;
    Ok(web::Json(grant.into()))
}
