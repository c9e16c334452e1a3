//! Driven port for the generative model that turns documents into notes.
use async_trait::async_trait;

use super::define_port_error;

/// MIME type declared for every submitted document.
pub const PDF_MIME_TYPE: &str = "application/pdf";

define_port_error! {
    /// Errors raised by note generator adapters.
    pub enum NoteGeneratorError {
        /// The request did not complete within the client timeout.
        Timeout { message: String } => "note generation timed out: {message}",
        /// Network or connection failure.
        Transport { message: String } => "note generation transport error: {message}",
        /// The upstream API answered with a non-success status.
        Rejected { status: u16, message: String } => "note generation rejected with status {status}: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "note generation response invalid: {message}",
        /// The model returned no text.
        EmptyResponse => "note generation returned no text",
    }
}

/// Raw document submitted for summarisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl SourceDocument {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: PDF_MIME_TYPE,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteGenerator: Send + Sync {
    /// Produce markdown notes for `document` using the configured prompt.
    async fn generate(&self, document: &SourceDocument) -> Result<String, NoteGeneratorError>;
}
