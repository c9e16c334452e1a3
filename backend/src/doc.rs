//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the DTOs
//! they exchange, and the session cookie security scheme. Swagger UI serves
//! the generated document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{CreditHistoryEntry, Dashboard, Error, ErrorCode, Role};
use crate::inbound::http::auth::{LoginRequest, SessionResponse, SessionUser};
use crate::inbound::http::notes::{GenerateNotesRequest, GenerateNotesResponse};
use crate::inbound::http::upload::{UploadBody, UploadResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Notes backend API",
        description = "Upload PDFs, turn them into markdown notes and track credit usage."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::auth::logout,
        crate::inbound::http::upload::create_upload,
        crate::inbound::http::notes::generate_notes,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        LoginRequest,
        SessionUser,
        SessionResponse,
        UploadBody,
        UploadResponse,
        GenerateNotesRequest,
        GenerateNotesResponse,
        Dashboard,
        CreditHistoryEntry,
    )),
    tags(
        (name = "auth", description = "Sign-in and session lifecycle"),
        (name = "notes", description = "Uploading documents and generating notes"),
        (name = "users", description = "Credit balance and history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
