//! Driven port verifying third-party sign-in tokens.
use async_trait::async_trait;

use crate::domain::{Role, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The token is invalid, expired or issued for another audience.
        Rejected { message: String } => "identity token rejected: {message}",
        /// The provider could not be reached or answered unexpectedly.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

/// Identity asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: UserId,
    pub role: Role,
    pub profile: UserProfile,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityProviderError>;
}
