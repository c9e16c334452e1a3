//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `migrations/` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Signed-in users and their remaining credits.
    users (id) {
        /// Subject identifier issued by the identity provider.
        id -> Text,
        name -> Nullable<Text>,
        email -> Nullable<Text>,
        image -> Nullable<Text>,
        /// `USER` or `ADMIN`.
        role -> Text,
        /// Remaining balance; a check constraint keeps it non-negative.
        credits -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only debit log.
    credit_history (id) {
        id -> Uuid,
        user_id -> Text,
        details -> Text,
        credits_used -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(credit_history -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(credit_history, users);
