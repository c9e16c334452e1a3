//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between Diesel rows and domain types; row
//! structs and the schema stay private to this module. Connections come from
//! a `bb8` pool through `diesel-async`, and every database failure is mapped
//! to the owning port's error type.
//!
//! # Example
//!
//! ```ignore
//! use notegen::outbound::persistence::{DbPool, DieselCreditLedger, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/notes")).await?;
//! let ledger = DieselCreditLedger::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_credit_ledger;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_credit_ledger::DieselCreditLedger;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
