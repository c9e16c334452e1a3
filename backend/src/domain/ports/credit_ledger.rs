//! Driven port for the credit ledger: user balances and their debit history.
use async_trait::async_trait;

use crate::domain::{
    ChargeReceipt, CreditCharge, Dashboard, Role, User, UserId, UserProfile,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credit ledger adapters.
    pub enum CreditLedgerError {
        /// The backing store could not be reached.
        Connection { message: String } => "credit ledger connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "credit ledger query failed: {message}",
        /// The conditional debit matched no row with enough credits.
        InsufficientCredits => "insufficient credits",
        /// No user row exists for the charged identifier.
        UserNotFound => "user not found",
    }
}

/// Identity data written on sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRecord {
    pub id: UserId,
    pub role: Role,
    pub profile: UserProfile,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Fetch a user and their current balance.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, CreditLedgerError>;

    /// Debit the balance and append a history entry in one transaction.
    ///
    /// The debit only applies when the balance at commit time covers
    /// `charge.credits_used`; otherwise nothing is written and
    /// [`CreditLedgerError::InsufficientCredits`] is returned.
    async fn charge(&self, charge: &CreditCharge) -> Result<ChargeReceipt, CreditLedgerError>;

    /// Balance and history, newest first, read from one snapshot.
    async fn dashboard(&self, id: &UserId) -> Result<Option<Dashboard>, CreditLedgerError>;

    /// Create the user with `initial_credits`, or refresh profile fields of an
    /// existing user without touching the balance.
    async fn record_sign_in(
        &self,
        record: &SignInRecord,
        initial_credits: u32,
    ) -> Result<User, CreditLedgerError>;
}
