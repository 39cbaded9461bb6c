//! A small bank assembled from the transfer core and the in-memory store.
//!
//! [`DemoBank`] owns one store and hands it to both services as their
//! load and record ports. It shows the wiring an application performs at
//! startup: build the adapters, build the services, share the store.

use buckpal::{
    AccountId, GetAccountBalanceService, Money, SendMoneyCommand, TransferConfig, TransferReceipt,
    TransferResult, TransferService,
};
use buckpal_memory::InMemoryAccountStore;

/// Transfer and balance services over a shared in-memory store.
pub struct DemoBank {
    store: InMemoryAccountStore,
    transfers: TransferService<InMemoryAccountStore, InMemoryAccountStore>,
    balances: GetAccountBalanceService<InMemoryAccountStore>,
}

impl DemoBank {
    /// Creates a bank with no accounts.
    pub fn new(config: TransferConfig) -> Self {
        let store = InMemoryAccountStore::new();
        Self {
            transfers: TransferService::new(store.clone(), store.clone(), config.clone()),
            balances: GetAccountBalanceService::new(store.clone(), config),
            store,
        }
    }

    /// Opens an account holding `opening_balance`.
    pub fn open_account(&self, account_id: AccountId, opening_balance: Money) {
        self.store.create_account(account_id, opening_balance);
    }

    /// Sends `amount` from `source` to `target`.
    pub async fn send_money(
        &self,
        source: AccountId,
        target: AccountId,
        amount: Money,
    ) -> TransferResult<TransferReceipt> {
        let command = SendMoneyCommand::new(source, target, amount)?;
        self.transfers.transfer(command).await
    }

    /// Current balance of `account_id`.
    pub async fn balance(&self, account_id: AccountId) -> TransferResult<Money> {
        self.balances.get_account_balance(account_id).await
    }

    /// The underlying store.
    pub const fn store(&self) -> &InMemoryAccountStore {
        &self.store
    }
}
