//! PDF-to-notes backend with credit metering.
//!
//! Signed-in users upload PDFs straight to object storage through presigned
//! grants, turn them into markdown notes with a generative model, and pay one
//! credit per generation. The crate follows a hexagonal layout:
//!
//! - `domain`: types, services and ports.
//! - `inbound::http`: actix-web handlers and the session gate.
//! - `outbound`: Postgres ledger, S3 storage, Gemini and Google adapters.
//! - `middleware`: trace identifier propagation.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
