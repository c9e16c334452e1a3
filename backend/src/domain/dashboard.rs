//! Read-only dashboard service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{CreditLedger, CreditLedgerError, DashboardQuery};
use crate::domain::{Dashboard, Error, UserId};

/// Serves the caller's balance and credit history.
#[derive(Clone)]
pub struct DashboardService<L> {
    ledger: Arc<L>,
}

impl<L> DashboardService<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

fn map_ledger_error(err: CreditLedgerError) -> Error {
    error!(error = %err, "dashboard query failed");
    Error::internal(format!("dashboard query failed: {err}"))
}

#[async_trait]
impl<L> DashboardQuery for DashboardService<L>
where
    L: CreditLedger,
{
    async fn dashboard(&self, caller: &UserId) -> Result<Dashboard, Error> {
        self.ledger
            .dashboard(caller)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}
