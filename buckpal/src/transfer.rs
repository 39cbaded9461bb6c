//! The send-money use case.
//!
//! [`TransferService`] moves money between two accounts:
//!
//! 1. checks the transfer threshold
//! 2. loads both accounts (a missing account fails before any lock is taken)
//! 3. locks both accounts in ascending id order, each with a bounded wait
//! 4. reloads both accounts under the locks and takes the transfer timestamp
//! 5. withdraws from the source, failing with `InsufficientFunds` on overdraft
//! 6. deposits into the target
//! 7. records the new activities of both accounts in a single write
//! 8. releases the locks in reverse order
//!
//! The steps are encoded as a typestate in [`typestate`], so a transfer
//! cannot deposit before it withdrew or persist before it holds its locks.
//! Locks are owned by the typestate value: whichever step fails, dropping
//! the value releases them.

mod typestate;

use crate::activity::Activity;
use crate::clock::{Clock, SystemClock};
use crate::command::SendMoneyCommand;
use crate::config::TransferConfig;
use crate::errors::{TransferError, TransferResult};
use crate::locking::AccountLocks;
use crate::money::Money;
use crate::ports::{LoadAccountPort, RecordActivitiesPort};
use crate::types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use typestate::TransferScope;

/// Where a transfer is in its protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferPhase {
    /// Command accepted, nothing loaded or locked yet.
    Initiated,
    /// The lower-ordered account is locked, the other one is not yet.
    FirstLocked,
    /// Every account of the transfer is locked.
    BothLocked,
    /// The source account accepted the withdrawal in memory.
    Withdrawn,
    /// The target account accepted the deposit in memory.
    Deposited,
    /// The store acknowledged the new activities.
    Persisted,
    /// All locks have been given back.
    Released,
    /// The transfer completed.
    Committed,
    /// The transfer stopped without committing.
    Aborted,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initiated => "initiated",
            Self::FirstLocked => "first-locked",
            Self::BothLocked => "both-locked",
            Self::Withdrawn => "withdrawn",
            Self::Deposited => "deposited",
            Self::Persisted => "persisted",
            Self::Released => "released",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Proof of a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Account the money was taken from
    pub source_account_id: AccountId,
    /// Account the money was given to
    pub target_account_id: AccountId,
    /// Amount moved
    pub amount: Money,
    /// When the transfer happened
    pub timestamp: Timestamp,
    /// Activities recorded for the transfer, with their assigned ids
    pub activities: Vec<Activity>,
}

/// Orchestrates money transfers between accounts.
///
/// Collaborators are passed in explicitly: a [`LoadAccountPort`] to read
/// accounts and a [`RecordActivitiesPort`] to persist new activities.
/// Services that must exclude each other share an [`AccountLocks`] table
/// via [`TransferService::with_locks`].
pub struct TransferService<L, R> {
    load_port: L,
    record_port: R,
    locks: AccountLocks,
    clock: Arc<dyn Clock>,
    config: TransferConfig,
}

impl<L, R> TransferService<L, R>
where
    L: LoadAccountPort,
    R: RecordActivitiesPort,
{
    /// Creates a service with its own lock table and the system clock.
    pub fn new(load_port: L, record_port: R, config: TransferConfig) -> Self {
        Self {
            load_port,
            record_port,
            locks: AccountLocks::new(),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Uses `locks` instead of a private lock table.
    #[must_use]
    pub fn with_locks(mut self, locks: AccountLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Uses `clock` for activity timestamps and baseline dates.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The lock table this service acquires account locks from.
    pub const fn locks(&self) -> &AccountLocks {
        &self.locks
    }

    /// The configuration this service runs with.
    pub const fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Sends money as described by `command`.
    ///
    /// Succeeds only if the withdrawal, the deposit and the write of the
    /// resulting activities all succeed. Every failure leaves the stored
    /// accounts untouched and every lock released.
    #[instrument(
        name = "transfer",
        skip(self, command),
        fields(
            source = %command.source_account_id(),
            target = %command.target_account_id(),
            amount = %command.amount()
        )
    )]
    pub async fn transfer(&self, command: SendMoneyCommand) -> TransferResult<TransferReceipt> {
        match self.execute(command).await {
            Ok(receipt) => {
                info!(phase = %TransferPhase::Committed, "transfer committed");
                Ok(receipt)
            }
            Err(error) => {
                warn!(phase = %TransferPhase::Aborted, %error, "transfer aborted");
                Err(error)
            }
        }
    }

    async fn execute(&self, command: SendMoneyCommand) -> TransferResult<TransferReceipt> {
        self.check_threshold(&command)?;

        let now = self.clock.now();
        let baseline_date = now.days_before(self.config.baseline_window.into_inner());

        let receipt = TransferScope::initiate(command, now, baseline_date)
            .check_accounts(&self.load_port)
            .await?
            .lock(&self.locks, self.config.lock_wait.as_duration())
            .await?
            .load(
                &self.load_port,
                self.clock.as_ref(),
                self.config.baseline_window.into_inner(),
            )
            .await?
            .withdraw()?
            .deposit()?
            .persist(&self.record_port)
            .await?
            .release();

        Ok(receipt)
    }

    fn check_threshold(&self, command: &SendMoneyCommand) -> Result<(), TransferError> {
        match self.config.maximum_transfer {
            Some(threshold) if command.amount() > threshold => {
                Err(TransferError::ThresholdExceeded {
                    threshold,
                    requested: command.amount(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl<L, R> fmt::Debug for TransferService<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferService")
            .field("locks", &self.locks)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
