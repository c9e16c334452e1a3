//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::{Error, Role, User, UserId, UserProfile};
use crate::inbound::http::session::SessionContext;

/// Path of the seeding route registered by handler tests.
pub const SEED_SESSION_PATH: &str = "/test/session/{id}";

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation and disables the `Secure` flag so cookies
/// survive plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler that signs in the user named in the path without touching ports.
pub async fn seed_session(
    session: SessionContext,
    id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = UserId::new(id.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&User {
        id,
        role: Role::User,
        credits: 0,
        profile: UserProfile::default(),
    })?;
    Ok(HttpResponse::NoContent().finish())
}

/// Extract the `session` cookie set on a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
