//! PostgreSQL-backed credit ledger.
//!
//! Charges run in one transaction: a conditional `UPDATE ... WHERE credits >=
//! cost RETURNING credits` followed by the history insert. Postgres row locks
//! serialise concurrent debits of the same user, so the balance can never go
//! negative and a debit never lands without its history entry.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CreditLedger, CreditLedgerError, SignInRecord};
use crate::domain::{
    ChargeReceipt, CreditCharge, CreditHistoryEntry, Dashboard, Role, User, UserId, UserProfile,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CreditHistoryRow, NewCreditHistoryRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{credit_history, users};

/// Diesel implementation of [`CreditLedger`].
#[derive(Clone)]
pub struct DieselCreditLedger {
    pool: DbPool,
}

impl DieselCreditLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CreditLedgerError {
    map_basic_pool_error(error, CreditLedgerError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CreditLedgerError {
    map_basic_diesel_error(
        error,
        CreditLedgerError::query,
        CreditLedgerError::connection,
    )
}

/// Failure inside the charge transaction. Any variant rolls it back.
#[derive(Debug)]
enum ChargeAbort {
    Insufficient,
    UnknownUser,
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for ChargeAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<ChargeAbort> for CreditLedgerError {
    fn from(abort: ChargeAbort) -> Self {
        match abort {
            ChargeAbort::Insufficient => Self::InsufficientCredits,
            ChargeAbort::UnknownUser => Self::UserNotFound,
            ChargeAbort::Database(error) => map_diesel_error(error),
        }
    }
}

fn to_credits(value: i32) -> Result<u32, CreditLedgerError> {
    u32::try_from(value).map_err(|_| CreditLedgerError::query("negative credit value in store"))
}

fn to_column(value: u32) -> Result<i32, CreditLedgerError> {
    i32::try_from(value).map_err(|_| CreditLedgerError::query("credit value exceeds column range"))
}

fn row_to_user(row: UserRow) -> Result<User, CreditLedgerError> {
    let UserRow {
        id,
        name,
        email,
        image,
        role,
        credits,
    } = row;
    Ok(User {
        id: UserId::new(id).map_err(|err| CreditLedgerError::query(err.to_string()))?,
        role: role
            .parse::<Role>()
            .map_err(|err| CreditLedgerError::query(err.to_string()))?,
        credits: to_credits(credits)?,
        profile: UserProfile { name, email, image },
    })
}

fn row_to_entry(row: CreditHistoryRow) -> Result<CreditHistoryEntry, CreditLedgerError> {
    Ok(CreditHistoryEntry {
        id: row.id,
        created_at: row.created_at,
        details: row.details,
        credits_used: to_credits(row.credits_used)?,
    })
}

async fn debit(
    conn: &mut AsyncPgConnection,
    user_id: &str,
    cost: i32,
    details: &str,
) -> Result<(i32, CreditHistoryRow), ChargeAbort> {
    let remaining: Option<i32> = diesel::update(
        users::table
            .filter(users::id.eq(user_id))
            .filter(users::credits.ge(cost)),
    )
    .set((
        users::credits.eq(users::credits - cost),
        users::updated_at.eq(diesel::dsl::now),
    ))
    .returning(users::credits)
    .get_result(conn)
    .await
    .optional()?;

    let Some(remaining) = remaining else {
        let exists: bool = diesel::select(diesel::dsl::exists(
            users::table.filter(users::id.eq(user_id)),
        ))
        .get_result(conn)
        .await?;
        return Err(if exists {
            ChargeAbort::Insufficient
        } else {
            ChargeAbort::UnknownUser
        });
    };

    let entry = diesel::insert_into(credit_history::table)
        .values(NewCreditHistoryRow {
            id: Uuid::new_v4(),
            user_id,
            details,
            credits_used: cost,
        })
        .returning(CreditHistoryRow::as_returning())
        .get_result(conn)
        .await?;
    Ok((remaining, entry))
}

#[async_trait]
impl CreditLedger for DieselCreditLedger {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, CreditLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_ref())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn charge(&self, charge: &CreditCharge) -> Result<ChargeReceipt, CreditLedgerError> {
        let cost = to_column(charge.credits_used)?;
        let user_id = charge.user_id.as_ref();
        let details = charge.details.as_str();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (remaining, entry) = conn
            .transaction(|conn| {
                async move { debit(conn, user_id, cost, details).await }.scope_boxed()
            })
            .await?;

        debug!(user_id, remaining, "credit charge committed");
        Ok(ChargeReceipt {
            entry: row_to_entry(entry)?,
            remaining: to_credits(remaining)?,
        })
    }

    async fn dashboard(&self, id: &UserId) -> Result<Option<Dashboard>, CreditLedgerError> {
        let user_id = id.as_ref();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Repeatable read so balance and history come from one snapshot.
        let snapshot = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| {
                async move {
                    let credits: Option<i32> = users::table
                        .find(user_id)
                        .select(users::credits)
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(credits) = credits else {
                        return Ok::<_, diesel::result::Error>(None);
                    };
                    let history: Vec<CreditHistoryRow> = credit_history::table
                        .filter(credit_history::user_id.eq(user_id))
                        .order_by((credit_history::created_at.desc(), credit_history::id.desc()))
                        .select(CreditHistoryRow::as_select())
                        .load(conn)
                        .await?;
                    Ok(Some((credits, history)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        snapshot
            .map(|(credits, history)| {
                Ok(Dashboard {
                    credits: to_credits(credits)?,
                    history: history
                        .into_iter()
                        .map(row_to_entry)
                        .collect::<Result<_, _>>()?,
                })
            })
            .transpose()
    }

    async fn record_sign_in(
        &self,
        record: &SignInRecord,
        initial_credits: u32,
    ) -> Result<User, CreditLedgerError> {
        let new_user = NewUserRow {
            id: record.id.as_ref(),
            name: record.profile.name.as_deref(),
            email: record.profile.email.as_deref(),
            image: record.profile.image.as_deref(),
            role: record.role.as_str(),
            credits: to_column(initial_credits)?,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Existing users keep their balance and role; only profile fields move.
        let row = diesel::insert_into(users::table)
            .values(&new_user)
            .on_conflict(users::id)
            .do_update()
            .set((
                users::name.eq(excluded(users::name)),
                users::email.eq(excluded(users::email)),
                users::image.eq(excluded(users::image)),
                users::updated_at.eq(diesel::dsl::now),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_row(role: &str, credits: i32) -> UserRow {
        UserRow {
            id: "g-1".into(),
            name: Some("Ada".into()),
            email: None,
            image: None,
            role: role.into(),
            credits,
        }
    }

    #[rstest]
    fn converts_rows_into_users() {
        let user = row_to_user(user_row("ADMIN", 4)).expect("valid row");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.credits, 4);
        assert_eq!(user.profile.name.as_deref(), Some("Ada"));
    }

    #[rstest]
    #[case(user_row("OWNER", 1))]
    #[case(user_row("USER", -1))]
    fn rejects_corrupt_rows(#[case] row: UserRow) {
        assert!(matches!(
            row_to_user(row),
            Err(CreditLedgerError::Query { .. })
        ));
    }

    #[rstest]
    #[case(ChargeAbort::Insufficient, CreditLedgerError::InsufficientCredits)]
    #[case(ChargeAbort::UnknownUser, CreditLedgerError::UserNotFound)]
    fn aborts_map_to_port_errors(#[case] abort: ChargeAbort, #[case] expected: CreditLedgerError) {
        assert_eq!(CreditLedgerError::from(abort), expected);
    }
}
