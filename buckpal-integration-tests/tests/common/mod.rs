//! Shared fixture: both services wired to one in-memory store.

#![allow(dead_code)]

use buckpal::testing::prelude::*;
use buckpal::{
    AccountId, Clock, GetAccountBalanceService, LockWaitMs, SendMoneyCommand, SystemClock,
    TransferConfig, TransferReceipt, TransferResult, TransferService,
};
use buckpal_memory::InMemoryAccountStore;
use std::sync::Arc;

pub type Transfers = TransferService<InMemoryAccountStore, InMemoryAccountStore>;

pub struct Bank {
    pub store: InMemoryAccountStore,
    pub transfers: Arc<Transfers>,
    pub balances: GetAccountBalanceService<InMemoryAccountStore>,
}

impl Bank {
    pub fn new() -> Self {
        Self::with_store(InMemoryAccountStore::new(), test_config())
    }

    /// Services on the system clock, so activities carry real, distinct
    /// timestamps in the order transfers actually commit.
    pub fn with_store(store: InMemoryAccountStore, config: TransferConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: InMemoryAccountStore,
        config: TransferConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transfers: Arc::new(
                TransferService::new(store.clone(), store.clone(), config.clone())
                    .with_clock(clock.clone()),
            ),
            balances: GetAccountBalanceService::new(store.clone(), config).with_clock(clock),
            store,
        }
    }

    pub fn open(&self, id: u64, balance: i64) -> AccountId {
        let id = account_id(id);
        self.store.create_account(id, Money::of(balance));
        id
    }

    pub async fn send(&self, source: u64, target: u64, amount: i64) -> TransferResult<TransferReceipt> {
        let command =
            SendMoneyCommand::new(account_id(source), account_id(target), Money::of(amount))?;
        self.transfers.transfer(command).await
    }

    pub async fn balance(&self, id: u64) -> Money {
        self.balances
            .get_account_balance(account_id(id))
            .await
            .unwrap()
    }
}

pub fn test_config() -> TransferConfig {
    TransferConfig::for_testing().unwrap()
}

pub fn config_with_lock_wait(millis: u64) -> TransferConfig {
    test_config().with_lock_wait(LockWaitMs::try_new(millis).unwrap())
}
