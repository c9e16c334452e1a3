//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The encrypted session cookie carries only the user id and role. Balances
//! are always read from the ledger, never from the cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Role, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Identity restored from a session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub id: UserId,
    pub role: Role,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user's id and role, rotating the session id.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id.as_ref())
            .and_then(|()| self.0.insert(ROLE_KEY, user.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop every value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in identity, if the cookie carries a valid one.
    ///
    /// Tampered or stale values are treated as anonymous.
    pub fn identity(&self) -> Result<Option<SessionIdentity>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let Some(raw_id) = read(USER_ID_KEY)? else {
            return Ok(None);
        };
        let id = match UserId::new(raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        let role = match read(ROLE_KEY)?.as_deref().map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            None => Role::default(),
            Some(Err(error)) => {
                warn!(%error, "invalid role in session cookie");
                return Ok(None);
            }
        };
        Ok(Some(SessionIdentity { id, role }))
    }

    /// Require a signed-in identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<SessionIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("Unauthorized"))
    }

    /// Require a signed-in user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.require_identity().map(|identity| identity.id)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
