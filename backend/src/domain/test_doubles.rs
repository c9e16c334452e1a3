//! In-memory ledger double for service tests.
//!
//! Mirrors the store's conditional debit: the balance check and the debit
//! happen under one lock, so concurrent charges cannot overdraw.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{CreditLedger, CreditLedgerError, SignInRecord};
use crate::domain::{
    ChargeReceipt, CreditCharge, CreditHistoryEntry, Dashboard, Role, User, UserId, UserProfile,
};

#[derive(Default)]
pub(crate) struct InMemoryCreditLedger {
    accounts: Mutex<HashMap<UserId, (User, Vec<CreditHistoryEntry>)>>,
}

impl InMemoryCreditLedger {
    pub(crate) fn with_user(id: &UserId, credits: u32) -> Self {
        let ledger = Self::default();
        ledger.insert(id, credits);
        ledger
    }

    pub(crate) fn insert(&self, id: &UserId, credits: u32) {
        let user = User {
            id: id.clone(),
            role: Role::User,
            credits,
            profile: UserProfile::default(),
        };
        self.lock().insert(id.clone(), (user, Vec::new()));
    }

    pub(crate) fn balance(&self, id: &UserId) -> Option<u32> {
        self.lock().get(id).map(|(user, _)| user.credits)
    }

    pub(crate) fn history_len(&self, id: &UserId) -> usize {
        self.lock().get(id).map_or(0, |(_, history)| history.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, (User, Vec<CreditHistoryEntry>)>> {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, CreditLedgerError> {
        Ok(self.lock().get(id).map(|(user, _)| user.clone()))
    }

    async fn charge(&self, charge: &CreditCharge) -> Result<ChargeReceipt, CreditLedgerError> {
        let mut accounts = self.lock();
        let (user, history) = accounts
            .get_mut(&charge.user_id)
            .ok_or(CreditLedgerError::UserNotFound)?;
        if user.credits < charge.credits_used {
            return Err(CreditLedgerError::InsufficientCredits);
        }
        user.credits -= charge.credits_used;
        let entry = CreditHistoryEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            details: charge.details.clone(),
            credits_used: charge.credits_used,
        };
        history.push(entry.clone());
        Ok(ChargeReceipt {
            entry,
            remaining: user.credits,
        })
    }

    async fn dashboard(&self, id: &UserId) -> Result<Option<Dashboard>, CreditLedgerError> {
        Ok(self.lock().get(id).map(|(user, history)| Dashboard {
            credits: user.credits,
            history: history.iter().rev().cloned().collect(),
        }))
    }

    async fn record_sign_in(
        &self,
        record: &SignInRecord,
        initial_credits: u32,
    ) -> Result<User, CreditLedgerError> {
        let mut accounts = self.lock();
        let (user, _) = accounts.entry(record.id.clone()).or_insert_with(|| {
            (
                User {
                    id: record.id.clone(),
                    role: record.role,
                    credits: initial_credits,
                    profile: UserProfile::default(),
                },
                Vec::new(),
            )
        });
        user.profile = record.profile.clone();
        Ok(user.clone())
    }
}
