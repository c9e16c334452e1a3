//! Sign-in service: exchanges a provider token for a stored user.
//!
//! New users start with the configured credit grant; returning users keep
//! their balance and only have profile fields refreshed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CreditLedger, CreditLedgerError, IdentityProvider, IdentityProviderError, SignIn, SignInRecord,
};
use crate::domain::{Error, User, UserId};

/// Credits granted to a user on first sign-in unless configured otherwise.
pub const DEFAULT_INITIAL_CREDITS: u32 = 10;

#[derive(Clone)]
pub struct SignInService<L, P> {
    ledger: Arc<L>,
    provider: Arc<P>,
    initial_credits: u32,
}

impl<L, P> SignInService<L, P> {
    pub fn new(ledger: Arc<L>, provider: Arc<P>) -> Self {
        Self {
            ledger,
            provider,
            initial_credits: DEFAULT_INITIAL_CREDITS,
        }
    }

    #[must_use]
    pub fn with_initial_credits(mut self, credits: u32) -> Self {
        self.initial_credits = credits;
        self
    }
}

fn map_provider_error(err: IdentityProviderError) -> Error {
    match err {
        IdentityProviderError::Rejected { .. } => {
            warn!(error = %err, "identity token rejected");
            Error::unauthorized("Invalid identity token")
        }
        IdentityProviderError::Unavailable { .. } => {
            error!(error = %err, "identity provider unavailable");
            Error::service_unavailable("identity provider unavailable")
        }
    }
}

fn map_ledger_error(err: CreditLedgerError) -> Error {
    match err {
        CreditLedgerError::Connection { .. } => {
            error!(error = %err, "credit ledger unavailable during sign-in");
            Error::service_unavailable("user store unavailable")
        }
        CreditLedgerError::UserNotFound => Error::unauthorized("login required"),
        CreditLedgerError::Query { .. } | CreditLedgerError::InsufficientCredits => {
            error!(error = %err, "credit ledger failure during sign-in");
            Error::internal(format!("credit ledger failure: {err}"))
        }
    }
}

#[async_trait]
impl<L, P> SignIn for SignInService<L, P>
where
    L: CreditLedger,
    P: IdentityProvider,
{
    async fn sign_in(&self, id_token: &str) -> Result<User, Error> {
        let id_token = id_token.trim();
        if id_token.is_empty() {
            return Err(Error::invalid_request("idToken must not be empty"));
        }
        let identity = self
            .provider
            .verify(id_token)
            .await
            .map_err(map_provider_error)?;
        let record = SignInRecord {
            id: identity.subject,
            role: identity.role,
            profile: identity.profile,
        };
        let user = self
            .ledger
            .record_sign_in(&record, self.initial_credits)
            .await
            .map_err(map_ledger_error)?;
        info!(user_id = %user.id, credits = user.credits, "user signed in");
        Ok(user)
    }

    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        self.ledger
            .find_user(id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}
