//! Sign-in handlers.
//!
//! ```text
//! POST /auth/login {"idToken":"<google id token>"}
//! GET /auth/session
//! POST /auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// ID token issued by the identity provider.
    pub id_token: String,
}

/// Public view of the signed-in user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    #[schema(example = "108234567890")]
    pub id: String,
    pub role: Role,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            role: user.role,
            name: user.profile.name,
            email: user.profile.email,
            image: user.profile.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: SessionUser,
}

/// Exchange an identity token for a session cookie.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Token rejected", body = Error),
        (status = 503, description = "Identity provider or user store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let user = state.sign_in.sign_in(&payload.id_token).await?;
    session.persist_user(&user)?;
    Ok(web::Json(SessionResponse { user: user.into() }))
}

/// Describe the current session.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current user", body = SessionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionResponse>> {
    let identity = session.require_identity()?;
    let mut user = state.sign_in.current_user(&identity.id).await?;
    user.role = identity.role;
    Ok(web::Json(SessionResponse { user: user.into() }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
