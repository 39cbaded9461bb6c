//! Builder patterns for creating test data.
//!
//! Every builder starts from a valid default so a test only spells out
//! the fields it cares about.

use crate::account::Account;
use crate::activity::Activity;
use crate::activity_window::ActivityWindow;
use crate::money::Money;
use crate::types::{AccountId, ActivityId, Timestamp};

use super::{account_id, august};

/// Builder for [`Activity`] values.
///
/// Defaults: owner and source account 42, target account 41, August 8th
/// 2018, amount 999, not persisted.
///
/// # Example
/// ```rust,ignore
/// let activity = ActivityBuilder::new()
///     .with_target_account(account_id(1))
///     .with_money(Money::of(500))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ActivityBuilder {
    id: Option<ActivityId>,
    owner_account_id: AccountId,
    source_account_id: AccountId,
    target_account_id: AccountId,
    timestamp: Timestamp,
    money: Money,
}

impl ActivityBuilder {
    /// Creates a builder with the default activity.
    pub fn new() -> Self {
        Self {
            id: None,
            owner_account_id: account_id(42),
            source_account_id: account_id(42),
            target_account_id: account_id(41),
            timestamp: august(8),
            money: Money::of(999),
        }
    }

    /// Sets the persisted id.
    #[must_use]
    pub const fn with_id(mut self, id: ActivityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the owning account.
    #[must_use]
    pub const fn with_owner_account(mut self, owner: AccountId) -> Self {
        self.owner_account_id = owner;
        self
    }

    /// Sets the source account.
    #[must_use]
    pub const fn with_source_account(mut self, source: AccountId) -> Self {
        self.source_account_id = source;
        self
    }

    /// Sets the target account.
    #[must_use]
    pub const fn with_target_account(mut self, target: AccountId) -> Self {
        self.target_account_id = target;
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the amount.
    #[must_use]
    pub const fn with_money(mut self, money: Money) -> Self {
        self.money = money;
        self
    }

    /// Builds the activity.
    ///
    /// # Panics
    ///
    /// Panics if the amount is negative.
    pub fn build(self) -> Activity {
        let activity = Activity::new(
            self.owner_account_id,
            self.source_account_id,
            self.target_account_id,
            self.timestamp,
            self.money,
        )
        .expect("test activities must have a non-negative amount");

        match self.id {
            Some(id) => activity.with_id(id),
            None => activity,
        }
    }
}

impl Default for ActivityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Account`] values.
///
/// Defaults: account 42, baseline balance 999, a window with two
/// persisted deposits into account 42.
#[derive(Debug, Clone)]
pub struct AccountBuilder {
    id: Option<AccountId>,
    baseline_balance: Money,
    activities: Vec<Activity>,
}

impl AccountBuilder {
    /// Creates a builder with the default account.
    pub fn new() -> Self {
        let deposit = |id: u64| {
            ActivityBuilder::new()
                .with_id(ActivityId::try_new(id).expect("literal ids are positive"))
                .with_source_account(account_id(41))
                .with_target_account(account_id(42))
                .build()
        };

        Self {
            id: Some(account_id(42)),
            baseline_balance: Money::of(999),
            activities: vec![deposit(1), deposit(2)],
        }
    }

    /// Sets the account id.
    #[must_use]
    pub const fn with_id(mut self, id: AccountId) -> Self {
        self.id = Some(id);
        self
    }

    /// Builds an account that has not been persisted.
    #[must_use]
    pub const fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Sets the baseline balance.
    #[must_use]
    pub const fn with_baseline_balance(mut self, baseline_balance: Money) -> Self {
        self.baseline_balance = baseline_balance;
        self
    }

    /// Replaces the window's activities.
    #[must_use]
    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    /// Builds the account.
    pub fn build(self) -> Account {
        let window = ActivityWindow::new(self.activities);
        match self.id {
            Some(id) => Account::with_id(id, self.baseline_balance, window),
            None => Account::without_id(self.baseline_balance, window),
        }
    }
}

impl Default for AccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}
