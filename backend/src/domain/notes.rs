//! Metered note generation.
//!
//! Steps run strictly in order and each short-circuits:
//! key ownership (403) → balance (402) → object fetch → model call →
//! conditional debit plus history entry in one ledger transaction.
//!
//! The balance is checked up front so an empty account never reaches storage
//! or the model, and re-checked by the conditional debit at commit time. A
//! request that loses a race at commit gets 402 and its notes are dropped.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CreditLedger, CreditLedgerError, GeneratedNotes, NoteGeneration, NoteGenerator,
    NoteGeneratorError, ObjectStorage, ObjectStorageError, SourceDocument,
};
use crate::domain::{CreditCharge, Error, StorageKey, UserId};

const FORBIDDEN_KEY: &str = "Invalid or Forbidden S3 key";
const INSUFFICIENT_CREDITS: &str = "Insufficient credits";

/// Orchestrates storage, the generative model and the credit ledger.
#[derive(Clone)]
pub struct NoteGenerationService<L, S, G> {
    ledger: Arc<L>,
    storage: Arc<S>,
    generator: Arc<G>,
}

impl<L, S, G> NoteGenerationService<L, S, G> {
    pub fn new(ledger: Arc<L>, storage: Arc<S>, generator: Arc<G>) -> Self {
        Self {
            ledger,
            storage,
            generator,
        }
    }
}

impl<L, S, G> NoteGenerationService<L, S, G>
where
    L: CreditLedger,
    S: ObjectStorage,
    G: NoteGenerator,
{
    fn authorize_key(caller: &UserId, raw: &str) -> Result<StorageKey, Error> {
        StorageKey::parse(raw)
            .filter(|key| key.is_owned_by(caller))
            .ok_or_else(|| {
                warn!(user_id = %caller, "rejected storage key outside caller namespace");
                Error::forbidden(FORBIDDEN_KEY)
            })
    }

    async fn ensure_balance(&self, caller: &UserId) -> Result<(), Error> {
        let user = self
            .ledger
            .find_user(caller)
            .await
            .map_err(Self::map_ledger_error)?;
        match user {
            Some(user) if user.has_credits() => Ok(()),
            Some(_) => Err(Error::payment_required(INSUFFICIENT_CREDITS)),
            None => {
                warn!(user_id = %caller, "session user has no ledger record");
                Err(Error::payment_required(INSUFFICIENT_CREDITS))
            }
        }
    }

    fn map_ledger_error(err: CreditLedgerError) -> Error {
        match err {
            CreditLedgerError::InsufficientCredits | CreditLedgerError::UserNotFound => {
                Error::payment_required(INSUFFICIENT_CREDITS)
            }
            CreditLedgerError::Connection { .. } | CreditLedgerError::Query { .. } => {
                error!(error = %err, "credit ledger failure");
                Error::internal(format!("credit ledger failure: {err}"))
            }
        }
    }

    fn map_storage_error(err: ObjectStorageError) -> Error {
        error!(error = %err, "failed to read uploaded document");
        Error::internal(format!("failed to read uploaded document: {err}"))
    }

    fn map_generator_error(err: NoteGeneratorError) -> Error {
        error!(error = %err, "note generation failed");
        Error::internal(format!("note generation failed: {err}"))
    }
}

#[async_trait]
impl<L, S, G> NoteGeneration for NoteGenerationService<L, S, G>
where
    L: CreditLedger,
    S: ObjectStorage,
    G: NoteGenerator,
{
    async fn generate_notes(&self, caller: &UserId, key: &str) -> Result<GeneratedNotes, Error> {
        let key = Self::authorize_key(caller, key)?;
        self.ensure_balance(caller).await?;

        let bytes = self
            .storage
            .fetch(&key)
            .await
            .map_err(Self::map_storage_error)?;
        let notes = self
            .generator
            .generate(&SourceDocument::pdf(bytes))
            .await
            .map_err(Self::map_generator_error)?;

        let charge = CreditCharge::for_generated_notes(caller.clone(), &key);
        let receipt = self.ledger.charge(&charge).await.map_err(|err| {
            if matches!(err, CreditLedgerError::InsufficientCredits) {
                warn!(user_id = %caller, key = %key, "balance exhausted before commit; notes withheld");
            }
            Self::map_ledger_error(err)
        })?;

        info!(
            user_id = %caller,
            key = %key,
            remaining = receipt.remaining,
            "generated notes"
        );
        Ok(GeneratedNotes {
            notes,
            remaining_credits: receipt.remaining,
        })
    }
}
