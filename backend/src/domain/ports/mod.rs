//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`CreditLedger`, `ObjectStorage`, `NoteGenerator`,
//! `IdentityProvider`) are implemented under `outbound`. Driving ports
//! (`UploadAuthorizer`, `NoteGeneration`, `DashboardQuery`, `SignIn`) are
//! implemented by domain services and called from `inbound::http`.

mod macros;
pub(crate) use macros::define_port_error;

mod credit_ledger;
mod dashboard_query;
mod identity_provider;
mod note_generation;
mod note_generator;
mod object_storage;
mod sign_in;
mod upload_authorizer;

#[cfg(test)]
pub use credit_ledger::MockCreditLedger;
pub use credit_ledger::{CreditLedger, CreditLedgerError, SignInRecord};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError, VerifiedIdentity};
#[cfg(test)]
pub use note_generation::MockNoteGeneration;
pub use note_generation::{GeneratedNotes, NoteGeneration};
#[cfg(test)]
pub use note_generator::MockNoteGenerator;
pub use note_generator::{NoteGenerator, NoteGeneratorError, PDF_MIME_TYPE, SourceDocument};
#[cfg(test)]
pub use object_storage::MockObjectStorage;
pub use object_storage::{ObjectStorage, ObjectStorageError, PresignedUpload};
#[cfg(test)]
pub use sign_in::MockSignIn;
pub use sign_in::SignIn;
#[cfg(test)]
pub use upload_authorizer::MockUploadAuthorizer;
pub use upload_authorizer::{UploadAuthorizer, UploadGrant, UploadRequest};
