//! Driving port for the metered PDF-to-notes use-case.
use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Notes produced for one stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNotes {
    pub notes: String,
    pub remaining_credits: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteGeneration: Send + Sync {
    /// Generate notes for the object at `key`, debiting the caller.
    async fn generate_notes(&self, caller: &UserId, key: &str) -> Result<GeneratedNotes, Error>;
}
