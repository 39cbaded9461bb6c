//! Typestate encoding of the transfer protocol.
//!
//! Each step consumes a `TransferScope` in one state and returns it in
//! the next, carrying only the data that state owns. Locks travel inside
//! the state from `Locked` to `Persisted`; an early return drops them.

use crate::account::Account;
use crate::activity::Activity;
use crate::clock::Clock;
use crate::command::SendMoneyCommand;
use crate::errors::TransferError;
use crate::locking::{lock_order, AccountLockSet, AccountLocks};
use crate::ports::{LoadAccountPort, PersistenceError, RecordActivitiesPort};
use crate::types::{AccountId, Timestamp};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::{TransferPhase, TransferReceipt};

/// Marker and data types for the transfer states.
pub mod states {
    use super::{AccountLockSet, LoadedAccounts};
    use crate::activity::Activity;

    /// Command accepted; nothing held.
    pub struct Initiated;

    /// Locks held, accounts not yet (re)loaded.
    pub struct Locked {
        pub(super) locks: AccountLockSet,
    }

    /// Locks held and fresh accounts loaded under them.
    pub struct Loaded {
        pub(super) locks: AccountLockSet,
        pub(super) accounts: LoadedAccounts,
    }

    /// The withdrawal was applied to the source in memory.
    pub struct Withdrawn {
        pub(super) locks: AccountLockSet,
        pub(super) accounts: LoadedAccounts,
    }

    /// The deposit was applied to the target in memory.
    pub struct Deposited {
        pub(super) locks: AccountLockSet,
        pub(super) accounts: LoadedAccounts,
    }

    /// The store acknowledged the new activities.
    pub struct Persisted {
        pub(super) locks: AccountLockSet,
        pub(super) recorded: Vec<Activity>,
    }
}

/// The aggregates taking part in one transfer.
///
/// A self-transfer works on a single aggregate so its withdrawal and
/// deposit land in the same window.
pub enum LoadedAccounts {
    /// Distinct source and target accounts.
    Pair {
        /// Account the money leaves
        source: Account,
        /// Account the money enters
        target: Account,
    },
    /// Source and target are the same account.
    Single(Account),
}

impl LoadedAccounts {
    fn source_mut(&mut self) -> &mut Account {
        match self {
            Self::Pair { source, .. } | Self::Single(source) => source,
        }
    }

    fn target_mut(&mut self) -> &mut Account {
        match self {
            Self::Pair { target, .. } | Self::Single(target) => target,
        }
    }

    fn latest_activity(&self) -> Option<Timestamp> {
        match self {
            Self::Pair { source, target } => source
                .activity_window()
                .end_timestamp()
                .max(target.activity_window().end_timestamp()),
            Self::Single(account) => account.activity_window().end_timestamp(),
        }
    }

    fn new_activities(&self) -> Vec<Activity> {
        match self {
            Self::Pair { source, target } => source
                .new_activities()
                .chain(target.new_activities())
                .cloned()
                .collect(),
            Self::Single(account) => account.new_activities().cloned().collect(),
        }
    }
}

/// One transfer moving through its protocol.
pub struct TransferScope<S> {
    command: SendMoneyCommand,
    timestamp: Timestamp,
    baseline_date: Timestamp,
    phase: TransferPhase,
    state: S,
}

impl<S> TransferScope<S> {
    fn into_parts(self) -> (TransferScope<()>, S) {
        let header = TransferScope {
            command: self.command,
            timestamp: self.timestamp,
            baseline_date: self.baseline_date,
            phase: self.phase,
            state: (),
        };
        (header, self.state)
    }

    fn with_state<N>(self, state: N) -> TransferScope<N> {
        TransferScope {
            command: self.command,
            timestamp: self.timestamp,
            baseline_date: self.baseline_date,
            phase: self.phase,
            state,
        }
    }

    fn advance<N>(mut self, phase: TransferPhase, state: N) -> TransferScope<N> {
        debug!(from = %self.phase, to = %phase, "transfer phase changed");
        self.phase = phase;
        self.with_state(state)
    }

    fn source_id(&self) -> AccountId {
        self.command.source_account_id()
    }

    fn target_id(&self) -> AccountId {
        self.command.target_account_id()
    }
}

impl TransferScope<states::Initiated> {
    /// Starts a transfer observed at `timestamp`.
    ///
    /// The timestamp and baseline only serve the existence check; both are
    /// taken again once the locks are held.
    pub const fn initiate(
        command: SendMoneyCommand,
        timestamp: Timestamp,
        baseline_date: Timestamp,
    ) -> Self {
        Self {
            command,
            timestamp,
            baseline_date,
            phase: TransferPhase::Initiated,
            state: states::Initiated,
        }
    }

    /// Fails fast, before any lock is taken, if an account does not exist.
    pub async fn check_accounts<L: LoadAccountPort>(
        self,
        load_port: &L,
    ) -> Result<Self, TransferError> {
        for account_id in lock_order(&[self.source_id(), self.target_id()]) {
            load_port
                .load_account(account_id, self.baseline_date)
                .await?;
        }
        Ok(self)
    }

    /// Locks the accounts, lowest id first.
    pub async fn lock(
        self,
        locks: &AccountLocks,
        wait: Duration,
    ) -> Result<TransferScope<states::Locked>, TransferError> {
        let order = lock_order(&[self.source_id(), self.target_id()]);
        let mut held = AccountLockSet::empty();
        let mut phase = self.phase;

        for account_id in &order {
            let guard = locks.acquire(*account_id, wait).await.map_err(|timeout| {
                warn!(account = %timeout.account, waited = ?timeout.waited, "account lock timed out");
                TransferError::from(timeout)
            })?;
            held.push(guard);

            phase = if held.len() == order.len() {
                TransferPhase::BothLocked
            } else {
                TransferPhase::FirstLocked
            };
            debug!(account = %account_id, %phase, "account locked");
        }

        Ok(self.advance(phase, states::Locked { locks: held }))
    }
}

impl TransferScope<states::Locked> {
    /// Loads the accounts again, now that nobody else can change them.
    ///
    /// The transfer's timestamp is read from `clock` here, and is never
    /// older than the newest activity of either reloaded account, so the
    /// new activities always extend the windows in order.
    pub async fn load<L: LoadAccountPort>(
        mut self,
        load_port: &L,
        clock: &dyn Clock,
        baseline_window_days: u32,
    ) -> Result<TransferScope<states::Loaded>, TransferError> {
        let now = clock.now();
        self.baseline_date = now.days_before(baseline_window_days);

        let accounts = if self.command.is_self_transfer() {
            LoadedAccounts::Single(self.load_one(load_port, self.source_id()).await?)
        } else {
            LoadedAccounts::Pair {
                source: self.load_one(load_port, self.source_id()).await?,
                target: self.load_one(load_port, self.target_id()).await?,
            }
        };

        self.timestamp = match accounts.latest_activity() {
            Some(latest) if latest > now => {
                debug!(%now, %latest, "clock behind the newest activity, using its timestamp");
                latest
            }
            _ => now,
        };

        let (scope, states::Locked { locks }) = self.into_parts();
        Ok(scope.with_state(states::Loaded { locks, accounts }))
    }

    async fn load_one<L: LoadAccountPort>(
        &self,
        load_port: &L,
        account_id: AccountId,
    ) -> Result<Account, TransferError> {
        let account = load_port
            .load_account(account_id, self.baseline_date)
            .await?;

        if account.id() != Some(account_id) {
            return Err(TransferError::InvalidState(format!(
                "loading account {account_id} returned account {:?}",
                account.id()
            )));
        }
        Ok(account)
    }
}

impl TransferScope<states::Loaded> {
    /// Withdraws the amount from the source account.
    pub fn withdraw(self) -> Result<TransferScope<states::Withdrawn>, TransferError> {
        let (
            scope,
            states::Loaded {
                locks,
                mut accounts,
            },
        ) = self.into_parts();
        let amount = scope.command.amount();
        let source_id = scope.source_id();

        let source = accounts.source_mut();
        let balance = source.calculate_balance()?;

        if !source.withdraw_at(amount, scope.target_id(), scope.timestamp)? {
            warn!(account = %source_id, %balance, requested = %amount, "insufficient funds");
            return Err(TransferError::InsufficientFunds {
                account: source_id,
                balance,
                requested: amount,
            });
        }

        Ok(scope.advance(
            TransferPhase::Withdrawn,
            states::Withdrawn { locks, accounts },
        ))
    }
}

impl TransferScope<states::Withdrawn> {
    /// Deposits the amount into the target account.
    pub fn deposit(self) -> Result<TransferScope<states::Deposited>, TransferError> {
        let (
            scope,
            states::Withdrawn {
                locks,
                mut accounts,
            },
        ) = self.into_parts();

        if !accounts.target_mut().deposit_at(
            scope.command.amount(),
            scope.source_id(),
            scope.timestamp,
        )? {
            return Err(TransferError::InvalidState(
                "target account refused a deposit".to_string(),
            ));
        }

        Ok(scope.advance(
            TransferPhase::Deposited,
            states::Deposited { locks, accounts },
        ))
    }
}

impl TransferScope<states::Deposited> {
    /// Records the new activities of both accounts in one write.
    ///
    /// The locks stay held until the store has answered.
    pub async fn persist<R: RecordActivitiesPort>(
        self,
        record_port: &R,
    ) -> Result<TransferScope<states::Persisted>, TransferError> {
        let (scope, states::Deposited { locks, accounts }) = self.into_parts();
        let phase = scope.phase;
        let activities = accounts.new_activities();

        let ids = record_port
            .record_activities(&activities)
            .await
            .map_err(|source| {
                error!(%phase, error = %source, "recording activities failed");
                TransferError::PersistenceFailure { phase, source }
            })?;

        if ids.len() != activities.len() {
            error!(
                %phase,
                expected = activities.len(),
                recorded = ids.len(),
                "store acknowledged an incomplete write"
            );
            return Err(TransferError::PersistenceFailure {
                phase,
                source: PersistenceError::Incomplete {
                    expected: activities.len(),
                    recorded: ids.len(),
                },
            });
        }

        let recorded = activities
            .into_iter()
            .zip(ids)
            .map(|(activity, id)| activity.with_id(id))
            .collect();

        Ok(scope.advance(
            TransferPhase::Persisted,
            states::Persisted { locks, recorded },
        ))
    }
}

impl TransferScope<states::Persisted> {
    /// Gives the locks back and produces the receipt.
    pub fn release(self) -> TransferReceipt {
        let (scope, states::Persisted { locks, recorded }) = self.into_parts();
        locks.release();
        let scope = scope.advance(TransferPhase::Released, ());

        TransferReceipt {
            source_account_id: scope.source_id(),
            target_account_id: scope.target_id(),
            amount: scope.command.amount(),
            timestamp: scope.timestamp,
            activities: recorded,
        }
    }
}
