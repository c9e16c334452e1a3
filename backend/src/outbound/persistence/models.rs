//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{credit_history, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub role: String,
    pub credits: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub image: Option<&'a str>,
    pub role: &'a str,
    pub credits: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credit_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CreditHistoryRow {
    pub id: Uuid,
    pub details: String,
    pub credits_used: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credit_history)]
pub(crate) struct NewCreditHistoryRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub details: &'a str,
    pub credits_used: i32,
}
