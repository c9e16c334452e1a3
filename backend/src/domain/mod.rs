//! Domain primitives, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP and
//! persistence layers, the ports adapters implement, and the services that
//! orchestrate them. Serialisation contracts are documented on each type.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, UserId, Role: signed-in identity and balance.
//! - StorageKey: owner-scoped object key for uploaded documents.
//! - Dashboard, CreditHistoryEntry: read model of the credit ledger.
//! - Services: UploadAuthorizationService, NoteGenerationService,
//!   DashboardService, SignInService.

pub mod credits;
pub mod dashboard;
pub mod error;
pub mod notes;
pub mod ports;
pub mod sign_in;
pub mod storage_key;
pub mod trace_id;
pub mod upload;
pub mod user;

#[cfg(test)]
pub(crate) mod test_doubles;

pub use self::credits::{
    ChargeReceipt, CreditCharge, CreditHistoryEntry, Dashboard, GENERATION_COST,
};
pub use self::dashboard::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::notes::NoteGenerationService;
pub use self::sign_in::{DEFAULT_INITIAL_CREDITS, SignInService};
pub use self::storage_key::{FileNameError, StorageKey, UploadFileName};
pub use self::trace_id::TraceId;
pub use self::upload::{DEFAULT_UPLOAD_TTL, UploadAuthorizationService};
pub use self::user::{Role, User, UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use notegen::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
