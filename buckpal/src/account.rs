//! The account aggregate.
//!
//! An account does not store its balance. It holds a baseline balance
//! (the net balance at the start of its activity window) and derives the
//! current balance by replaying the window on top of it.

use crate::activity::{Activity, ActivityError};
use crate::activity_window::{ActivityWindow, ActivityWindowError};
use crate::money::{Money, MoneyError};
use crate::types::{AccountId, Timestamp};
use thiserror::Error;

/// Errors that can occur while mutating an [`Account`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// The account has not been persisted and cannot own activities.
    #[error("account has no id; only persisted accounts can move money")]
    MissingId,

    /// Balance arithmetic left the representable range.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The new activity could not be created.
    #[error(transparent)]
    Activity(#[from] ActivityError),

    /// The new activity could not be appended to the window.
    #[error(transparent)]
    Window(#[from] ActivityWindowError),
}

/// An account holding money, reconstructed from a baseline and a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: Option<AccountId>,
    baseline_balance: Money,
    activity_window: ActivityWindow,
}

impl Account {
    /// Creates an account that has not been persisted yet.
    pub const fn without_id(baseline_balance: Money, activity_window: ActivityWindow) -> Self {
        Self {
            id: None,
            baseline_balance,
            activity_window,
        }
    }

    /// Reconstitutes a persisted account.
    pub const fn with_id(
        id: AccountId,
        baseline_balance: Money,
        activity_window: ActivityWindow,
    ) -> Self {
        Self {
            id: Some(id),
            baseline_balance,
            activity_window,
        }
    }

    /// The account id, absent until persisted.
    pub const fn id(&self) -> Option<AccountId> {
        self.id
    }

    /// Net balance as of the start of the activity window.
    pub const fn baseline_balance(&self) -> Money {
        self.baseline_balance
    }

    /// The activities loaded or created for this account.
    pub const fn activity_window(&self) -> &ActivityWindow {
        &self.activity_window
    }

    /// Current balance: the baseline plus the window's net effect.
    ///
    /// An account without id owns no activities, so its balance is the
    /// baseline.
    pub fn calculate_balance(&self) -> Result<Money, MoneyError> {
        match self.id {
            Some(id) => self
                .baseline_balance
                .add(self.activity_window.calculate_balance(id)?),
            None => Ok(self.baseline_balance),
        }
    }

    /// Withdraws `amount` towards `target_account_id`, timestamped now.
    ///
    /// See [`Account::withdraw_at`].
    pub fn withdraw(
        &mut self,
        amount: Money,
        target_account_id: AccountId,
    ) -> Result<bool, AccountError> {
        self.withdraw_at(amount, target_account_id, Timestamp::now())
    }

    /// Withdraws `amount` towards `target_account_id` at `timestamp`.
    ///
    /// The caller guarantees `amount` is positive. Returns `Ok(false)` and
    /// leaves the account untouched when the withdrawal would take the
    /// balance below zero.
    pub fn withdraw_at(
        &mut self,
        amount: Money,
        target_account_id: AccountId,
        timestamp: Timestamp,
    ) -> Result<bool, AccountError> {
        let id = self.id.ok_or(AccountError::MissingId)?;

        if !self.may_withdraw(amount)? {
            return Ok(false);
        }

        let withdrawal = Activity::new(id, id, target_account_id, timestamp, amount)?;
        self.activity_window.add_activity(withdrawal)?;
        Ok(true)
    }

    /// Deposits `amount` coming from `source_account_id`, timestamped now.
    pub fn deposit(
        &mut self,
        amount: Money,
        source_account_id: AccountId,
    ) -> Result<bool, AccountError> {
        self.deposit_at(amount, source_account_id, Timestamp::now())
    }

    /// Deposits `amount` coming from `source_account_id` at `timestamp`.
    ///
    /// Receiving money has no business rule, so this always yields
    /// `Ok(true)` unless the activity itself cannot be recorded.
    pub fn deposit_at(
        &mut self,
        amount: Money,
        source_account_id: AccountId,
        timestamp: Timestamp,
    ) -> Result<bool, AccountError> {
        let id = self.id.ok_or(AccountError::MissingId)?;
        let deposit = Activity::new(id, source_account_id, id, timestamp, amount)?;
        self.activity_window.add_activity(deposit)?;
        Ok(true)
    }

    /// Activities created in memory that persistence has not seen yet.
    pub fn new_activities(&self) -> impl Iterator<Item = &Activity> + '_ {
        self.activity_window
            .activities()
            .filter(|activity| !activity.is_persisted())
    }

    fn may_withdraw(&self, amount: Money) -> Result<bool, MoneyError> {
        let remaining = self.calculate_balance()?.add(amount.negate()?)?;
        Ok(remaining.is_positive_or_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::generators::{arb_money, arb_non_negative_money, arb_positive_money};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn account_id(raw: u64) -> AccountId {
        AccountId::try_new(raw).unwrap()
    }

    fn day(day: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 8, day, 0, 0, 0).unwrap())
    }

    fn activity(source: u64, target: u64, owner: u64, at: Timestamp, units: i64) -> Activity {
        Activity::new(
            account_id(owner),
            account_id(source),
            account_id(target),
            at,
            Money::of(units),
        )
        .unwrap()
    }

    /// Account 1 with baseline 555 plus +999 and +1 deposits: balance 1555.
    fn funded_account() -> Account {
        Account::with_id(
            account_id(1),
            Money::of(555),
            ActivityWindow::new(vec![
                activity(2, 1, 1, day(3), 999),
                activity(2, 1, 1, day(4), 1),
            ]),
        )
    }

    #[test]
    fn balance_is_baseline_plus_window() {
        assert_eq!(funded_account().calculate_balance(), Ok(Money::of(1555)));
    }

    #[test]
    fn withdrawal_succeeds_within_balance() {
        let mut account = funded_account();
        let ok = account.withdraw_at(Money::of(555), account_id(99), day(5)).unwrap();

        assert!(ok);
        assert_eq!(account.activity_window().len(), 3);
        assert_eq!(account.calculate_balance(), Ok(Money::of(1000)));
    }

    #[test]
    fn withdrawal_of_entire_balance_succeeds() {
        let mut account = funded_account();
        assert!(account.withdraw_at(Money::of(1555), account_id(99), day(5)).unwrap());
        assert_eq!(account.calculate_balance(), Ok(Money::zero()));
    }

    #[test]
    fn withdrawal_failure_leaves_window_untouched() {
        let mut account = funded_account();
        let before = account.activity_window().clone();

        let ok = account.withdraw_at(Money::of(1556), account_id(99), day(5)).unwrap();

        assert!(!ok);
        assert_eq!(account.activity_window(), &before);
        assert_eq!(account.calculate_balance(), Ok(Money::of(1555)));
    }

    #[test]
    fn withdrawal_records_owner_source_and_target() {
        let mut account = funded_account();
        account.withdraw_at(Money::of(5), account_id(99), day(5)).unwrap();

        let created: Vec<&Activity> = account.new_activities().collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].owner_account_id(), account_id(1));
        assert_eq!(created[0].source_account_id(), account_id(1));
        assert_eq!(created[0].target_account_id(), account_id(99));
        assert_eq!(created[0].timestamp(), day(5));
    }

    #[test]
    fn deposit_always_succeeds() {
        let mut account = Account::with_id(account_id(1), Money::zero(), ActivityWindow::empty());
        assert!(account.deposit_at(Money::of(555), account_id(2), day(5)).unwrap());
        assert_eq!(account.calculate_balance(), Ok(Money::of(555)));
    }

    #[test]
    fn self_transfer_keeps_balance() {
        let mut account = funded_account();
        assert!(account.withdraw_at(Money::of(500), account_id(1), day(5)).unwrap());
        assert!(account.deposit_at(Money::of(500), account_id(1), day(5)).unwrap());
        assert_eq!(account.calculate_balance(), Ok(Money::of(1555)));
    }

    #[test]
    fn unpersisted_account_cannot_move_money() {
        let mut account = Account::without_id(Money::of(100), ActivityWindow::empty());
        assert_eq!(account.calculate_balance(), Ok(Money::of(100)));
        assert_eq!(
            account.withdraw_at(Money::of(10), account_id(2), day(5)),
            Err(AccountError::MissingId)
        );
        assert_eq!(
            account.deposit_at(Money::of(10), account_id(2), day(5)),
            Err(AccountError::MissingId)
        );
    }

    #[test]
    fn loaded_activities_are_not_new() {
        let persisted = activity(2, 1, 1, day(3), 10)
            .with_id(crate::types::ActivityId::try_new(1).unwrap());
        let account = Account::with_id(
            account_id(1),
            Money::zero(),
            ActivityWindow::new(vec![persisted]),
        );
        assert_eq!(account.new_activities().count(), 0);
    }

    proptest! {
        #[test]
        fn balance_equals_baseline_plus_window_net(
            baseline in arb_money(),
            moves in prop::collection::vec((0u8..4, arb_positive_money(), 1u32..=28), 0..12),
        ) {
            let mut expected = baseline.minor_units();
            let activities: Vec<Activity> = moves
                .iter()
                .map(|&(kind, amount, at)| {
                    let (source, target) = match kind {
                        0 => (2, 1),
                        1 => (1, 2),
                        2 => (1, 1),
                        _ => (2, 3),
                    };
                    match kind {
                        0 => expected += amount.minor_units(),
                        1 => expected -= amount.minor_units(),
                        _ => {}
                    }
                    activity(source, target, 1, day(at), amount.minor_units())
                })
                .collect();

            let account = Account::with_id(account_id(1), baseline, ActivityWindow::new(activities));
            prop_assert_eq!(account.calculate_balance(), Ok(Money::of(expected)));
        }

        #[test]
        fn deposit_increases_balance_by_amount(
            baseline in arb_non_negative_money(),
            amount in arb_positive_money(),
        ) {
            let mut account = Account::with_id(account_id(1), baseline, ActivityWindow::empty());
            prop_assert!(account.deposit_at(amount, account_id(2), day(5)).unwrap());
            prop_assert_eq!(account.calculate_balance(), baseline.add(amount));
        }

        #[test]
        fn withdrawal_is_permitted_exactly_when_covered(
            balance in arb_non_negative_money(),
            amount in arb_positive_money(),
        ) {
            let mut account = Account::with_id(account_id(1), balance, ActivityWindow::empty());
            let permitted = account.withdraw_at(amount, account_id(2), day(5)).unwrap();

            prop_assert_eq!(permitted, amount <= balance);
            prop_assert!(!account.calculate_balance().unwrap().is_negative());
            if !permitted {
                prop_assert!(account.activity_window().is_empty());
            }
        }
    }
}
