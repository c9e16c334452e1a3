//! Credit ledger values: charges, history entries and the dashboard view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{StorageKey, UserId};

/// Credits debited for one successful note generation.
pub const GENERATION_COST: u32 = 1;

/// Immutable record of one debit.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use notegen::domain::CreditHistoryEntry;
/// use uuid::Uuid;
///
/// let entry = CreditHistoryEntry {
///     id: Uuid::nil(),
///     created_at: Utc::now(),
///     details: "Generated notes for 171-foo.pdf".into(),
///     credits_used: 1,
/// };
/// let json = serde_json::to_value(&entry).expect("serialise");
/// assert_eq!(json["creditsUsed"], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditHistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[schema(example = "Generated notes for 1717000000000-lecture.pdf")]
    pub details: String,
    #[schema(example = 1)]
    pub credits_used: u32,
}

/// Balance plus history, newest entry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[schema(example = 9)]
    pub credits: u32,
    pub history: Vec<CreditHistoryEntry>,
}

/// A debit to apply atomically with its history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditCharge {
    pub user_id: UserId,
    pub credits_used: u32,
    pub details: String,
}

impl CreditCharge {
    /// The charge recorded after notes were generated for `key`.
    ///
    /// # Examples
    /// ```
    /// use notegen::domain::{CreditCharge, StorageKey, UserId};
    ///
    /// let user = UserId::new("u1").expect("id");
    /// let key = StorageKey::parse("uploads/u1/171-foo.pdf").expect("key");
    /// let charge = CreditCharge::for_generated_notes(user, &key);
    /// assert_eq!(charge.details, "Generated notes for 171-foo.pdf");
    /// assert_eq!(charge.credits_used, 1);
    /// ```
    pub fn for_generated_notes(user_id: UserId, key: &StorageKey) -> Self {
        Self {
            user_id,
            credits_used: GENERATION_COST,
            details: format!("Generated notes for {}", key.file_name()),
        }
    }
}

/// Result of a committed charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    pub entry: CreditHistoryEntry,
    pub remaining: u32,
}
