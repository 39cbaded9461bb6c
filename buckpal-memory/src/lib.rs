//! In-memory adapter for `BuckPal`
//!
//! This crate provides an in-memory implementation of the
//! `LoadAccountPort` and `RecordActivitiesPort` traits from the buckpal
//! crate, useful for testing and development scenarios where persistence
//! is not required.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use buckpal::account::Account;
use buckpal::activity::Activity;
use buckpal::activity_window::ActivityWindow;
use buckpal::money::{Money, MoneyError};
use buckpal::ports::{LoadAccountError, LoadAccountPort, PersistenceError, RecordActivitiesPort};
use buckpal::types::{AccountId, ActivityId, Timestamp};
use parking_lot::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct StoreState {
    // Opening balance of every known account
    accounts: HashMap<AccountId, Money>,
    // Every recorded activity, in recording order
    activities: Vec<Activity>,
    last_activity_id: u64,
}

impl StoreState {
    fn next_activity_id(&mut self) -> Result<ActivityId, PersistenceError> {
        let next = self.last_activity_id + 1;
        let id = ActivityId::try_new(next)
            .map_err(|error| PersistenceError::WriteFailed(error.to_string()))?;
        self.last_activity_id = next;
        Ok(id)
    }
}

/// Thread-safe in-memory account store.
///
/// Accounts are registered with an opening balance; activities are kept in
/// a single log. Loading an account folds every activity it owns from
/// before the baseline date into the baseline balance and puts the rest
/// into its activity window.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    state: Arc<RwLock<StoreState>>,
    fail_writes: Arc<AtomicBool>,
    write_latency: Option<Duration>,
}

impl InMemoryAccountStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every write by `latency`, to widen race windows in tests.
    #[must_use]
    pub const fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    /// Registers `account_id` with an opening balance.
    ///
    /// Registering an existing account replaces its opening balance.
    pub fn create_account(&self, account_id: AccountId, opening_balance: Money) {
        self.state
            .write()
            .accounts
            .insert(account_id, opening_balance);
    }

    /// Whether `account_id` is registered.
    pub fn contains_account(&self, account_id: AccountId) -> bool {
        self.state.read().accounts.contains_key(&account_id)
    }

    /// Records a single historical activity, bypassing the write toggle.
    pub fn seed_activity(&self, activity: Activity) -> Result<ActivityId, PersistenceError> {
        let mut state = self.state.write();
        ensure_owner_known(&state, &activity)?;
        let id = state.next_activity_id()?;
        state.activities.push(activity.with_id(id));
        Ok(id)
    }

    /// Makes every following `record_activities` call fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every recorded activity, in recording order.
    pub fn recorded_activities(&self) -> Vec<Activity> {
        self.state.read().activities.clone()
    }

    /// Recorded activities owned by `account_id`.
    pub fn activities_of(&self, account_id: AccountId) -> Vec<Activity> {
        self.state
            .read()
            .activities
            .iter()
            .filter(|activity| activity.owner_account_id() == account_id)
            .cloned()
            .collect()
    }
}

fn ensure_owner_known(state: &StoreState, activity: &Activity) -> Result<(), PersistenceError> {
    if state.accounts.contains_key(&activity.owner_account_id()) {
        Ok(())
    } else {
        Err(PersistenceError::WriteFailed(format!(
            "activity owned by unknown account {}",
            activity.owner_account_id()
        )))
    }
}

#[async_trait]
impl LoadAccountPort for InMemoryAccountStore {
    async fn load_account(
        &self,
        account_id: AccountId,
        baseline_date: Timestamp,
    ) -> Result<Account, LoadAccountError> {
        let state = self.state.read();

        let opening_balance = *state
            .accounts
            .get(&account_id)
            .ok_or(LoadAccountError::NotFound(account_id))?;

        let (history, window): (Vec<Activity>, Vec<Activity>) = state
            .activities
            .iter()
            .filter(|activity| activity.owner_account_id() == account_id)
            .cloned()
            .partition(|activity| activity.timestamp() < baseline_date);

        let unavailable = |error: MoneyError| LoadAccountError::Unavailable(error.to_string());
        let baseline_balance = ActivityWindow::new(history)
            .calculate_balance(account_id)
            .and_then(|net| opening_balance.add(net))
            .map_err(unavailable)?;

        let window = ActivityWindow::since(baseline_date, window)
            .map_err(|error| LoadAccountError::Unavailable(error.to_string()))?;

        debug!(
            account = %account_id,
            %baseline_balance,
            window = window.len(),
            "account loaded"
        );
        Ok(Account::with_id(account_id, baseline_balance, window))
    }
}

#[async_trait]
impl RecordActivitiesPort for InMemoryAccountStore {
    async fn record_activities(
        &self,
        activities: &[Activity],
    ) -> Result<Vec<ActivityId>, PersistenceError> {
        if let Some(latency) = self.write_latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            warn!(count = activities.len(), "write failure injected");
            return Err(PersistenceError::WriteFailed(
                "store is rejecting writes".to_string(),
            ));
        }

        let mut state = self.state.write();

        // All or nothing: validate everything before the first insert
        for activity in activities {
            ensure_owner_known(&state, activity)?;
        }

        let mut ids = Vec::with_capacity(activities.len());
        for activity in activities {
            let id = state.next_activity_id()?;
            state.activities.push(activity.clone().with_id(id));
            ids.push(id);
        }

        debug!(count = ids.len(), "activities recorded");
        Ok(ids)
    }
}
