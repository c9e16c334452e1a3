//! Note generation handler.
//!
//! ```text
//! POST /notes/generate {"key":"uploads/<userId>/<millis>-<name>.pdf"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body of `POST /notes/generate`.
///
/// A missing or non-string `key` reads as empty so ownership validation
/// rejects it with 403 rather than the JSON layer answering 400.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct GenerateNotesRequest {
    /// Storage key returned by `/upload`.
    #[schema(example = "uploads/108234567890/1717000000000-lecture.pdf")]
    #[serde(deserialize_with = "string_or_empty")]
    pub key: String,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(key) => key,
        _ => String::new(),
    })
}

impl GenerateNotesRequest {
    /// Decode a raw body, treating anything unreadable as an empty key.
    fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|error| {
            debug!(%error, "unreadable generate body; treating key as empty");
            Self::default()
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateNotesResponse {
    /// Markdown notes.
    pub notes: String,
}

/// Summarise an uploaded PDF and debit one credit.
#[utoipa::path(
    post,
    path = "/notes/generate",
    request_body = GenerateNotesRequest,
    responses(
        (status = 200, description = "Generated notes", body = GenerateNotesResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 402, description = "Insufficient credits", body = Error),
        (status = 403, description = "Key outside the caller's namespace", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notes"],
    operation_id = "generateNotes"
)]
#[post("/notes/generate")]
pub async fn generate_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<web::Json<GenerateNotesResponse>> {
    // The session gate runs before the body is interpreted.
    let caller = session.require_user_id()?;
    let request = GenerateNotesRequest::from_body(&body);
    let generated = state.notes.generate_notes(&caller, &request.key).await?;
    Ok(web::Json(GenerateNotesResponse {
        notes: generated.notes,
    }))
}
