//! Per-account exclusive locks.
//!
//! A transfer holds the locks of both its accounts from before the
//! withdrawal until its activities are persisted. To rule out circular
//! waits, locks are always taken in ascending [`AccountId`] order, no
//! matter which account is the source. Each acquisition waits at most a
//! bounded time.
//!
//! ```rust,ignore
//! let locks = AccountLocks::new();
//! let held = locks.acquire_ordered(&[target, source], wait).await?;
//! // ... withdraw, deposit, persist ...
//! drop(held); // released in reverse acquisition order
//! ```

use crate::types::AccountId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, trace};

/// A lock could not be acquired within the allowed wait.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("lock on account {account} not acquired within {waited:?}")]
pub struct LockTimeoutError {
    /// Account whose lock timed out
    pub account: AccountId,
    /// How long the caller waited
    pub waited: Duration,
}

/// The order in which `accounts` must be locked: ascending, without duplicates.
pub fn lock_order(accounts: &[AccountId]) -> Vec<AccountId> {
    let mut ordered = accounts.to_vec();
    ordered.sort_unstable();
    ordered.dedup();
    ordered
}

type LockTable = Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>;

/// In-process table of account locks.
///
/// Cloning is cheap and clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    table: Arc<LockTable>,
}

impl AccountLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks every account in `accounts`, lowest id first.
    ///
    /// Duplicate ids are locked once. If any lock times out, the locks
    /// already taken are released before the error is returned.
    pub async fn acquire_ordered(
        &self,
        accounts: &[AccountId],
        wait: Duration,
    ) -> Result<AccountLockSet, LockTimeoutError> {
        let mut held = AccountLockSet::empty();
        for account in lock_order(accounts) {
            held.push(self.acquire(account, wait).await?);
        }
        Ok(held)
    }

    /// Locks a single account.
    pub async fn acquire(
        &self,
        account: AccountId,
        wait: Duration,
    ) -> Result<AccountLockGuard, LockTimeoutError> {
        let mutex = Arc::clone(self.table.lock().entry(account).or_default());

        trace!(%account, "waiting for account lock");
        match tokio::time::timeout(wait, mutex.lock_owned()).await {
            Ok(guard) => {
                debug!(%account, "account lock acquired");
                Ok(AccountLockGuard {
                    account,
                    guard: Some(guard),
                    table: Arc::clone(&self.table),
                })
            }
            Err(_) => {
                self.prune(account);
                Err(LockTimeoutError {
                    account,
                    waited: wait,
                })
            }
        }
    }

    /// Whether some task currently holds the lock on `account`.
    pub fn is_locked(&self, account: AccountId) -> bool {
        self.table
            .lock()
            .get(&account)
            .is_some_and(|mutex| mutex.try_lock().is_err())
    }

    /// Number of accounts with a live table entry (held or awaited).
    pub fn entry_count(&self) -> usize {
        self.table.lock().len()
    }

    fn prune(&self, account: AccountId) {
        prune_entry(&self.table, account);
    }
}

/// Drops the table entry for `account` when nobody holds or awaits it.
///
/// Entries are only cloned while the table mutex is held, so a strong
/// count of one under that mutex means the table is the sole owner.
fn prune_entry(table: &LockTable, account: AccountId) {
    let mut table = table.lock();
    if table
        .get(&account)
        .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
    {
        table.remove(&account);
    }
}

/// Exclusive hold on one account. Released on drop.
#[derive(Debug)]
pub struct AccountLockGuard {
    account: AccountId,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl AccountLockGuard {
    /// The locked account.
    pub const fn account(&self) -> AccountId {
        self.account
    }
}

impl Drop for AccountLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        prune_entry(&self.table, self.account);
        debug!(account = %self.account, "account lock released");
    }
}

/// Locks held by one unit of work, in acquisition order.
///
/// Dropping the set releases the locks in reverse acquisition order.
#[derive(Debug)]
pub struct AccountLockSet {
    guards: Vec<AccountLockGuard>,
}

impl AccountLockSet {
    pub(crate) const fn empty() -> Self {
        Self { guards: Vec::new() }
    }

    pub(crate) fn push(&mut self, guard: AccountLockGuard) {
        self.guards.push(guard);
    }

    /// Number of locks held.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no lock is held.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// The locked accounts in acquisition order.
    pub fn accounts(&self) -> Vec<AccountId> {
        self.guards.iter().map(AccountLockGuard::account).collect()
    }

    /// Releases every lock now, in reverse acquisition order.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for AccountLockSet {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}
