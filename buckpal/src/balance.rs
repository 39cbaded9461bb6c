//! Read-only account balance query.

use crate::clock::{Clock, SystemClock};
use crate::config::TransferConfig;
use crate::errors::TransferResult;
use crate::money::Money;
use crate::ports::LoadAccountPort;
use crate::types::AccountId;
use std::sync::Arc;
use tracing::instrument;

/// Answers "how much money is in this account right now".
///
/// Loads the account with the configured baseline window and calculates
/// its balance. Takes no locks: the answer may already be stale when a
/// concurrent transfer commits.
pub struct GetAccountBalanceService<L> {
    load_port: L,
    clock: Arc<dyn Clock>,
    config: TransferConfig,
}

impl<L: LoadAccountPort> GetAccountBalanceService<L> {
    /// Creates the query service using the system clock.
    pub fn new(load_port: L, config: TransferConfig) -> Self {
        Self {
            load_port,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Uses `clock` to compute the baseline date.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current balance of `account_id`.
    #[instrument(skip(self), fields(account = %account_id))]
    pub async fn get_account_balance(&self, account_id: AccountId) -> TransferResult<Money> {
        let baseline_date = self
            .clock
            .now()
            .days_before(self.config.baseline_window.into_inner());
        let account = self
            .load_port
            .load_account(account_id, baseline_date)
            .await?;
        Ok(account.calculate_balance()?)
    }
}
