//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod notes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod upload;

pub use error::ApiResult;
