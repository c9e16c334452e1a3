//! Outbound adapters implementing the driven ports.
//!
//! - `persistence`: PostgreSQL credit ledger via Diesel.
//! - `storage`: S3 presigned uploads and object reads.
//! - `generation`: Gemini note generation over HTTP.
//! - `identity`: Google ID token verification.

pub mod generation;
pub mod identity;
pub mod persistence;
pub mod storage;
