//! Driving port returning a user's balance and credit history.
use async_trait::async_trait;

use crate::domain::{Dashboard, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    async fn dashboard(&self, caller: &UserId) -> Result<Dashboard, Error>;
}
