//! Driving port for establishing and describing a signed-in identity.
//!
//! Inbound adapters exchange a provider token for a stored [`User`] and keep
//! only the id and role in the session cookie.
use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignIn: Send + Sync {
    /// Verify `id_token` and create or refresh the user it identifies.
    async fn sign_in(&self, id_token: &str) -> Result<User, Error>;

    /// Load the stored user behind an existing session.
    async fn current_user(&self, id: &UserId) -> Result<User, Error>;
}
