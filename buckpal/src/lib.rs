//! `BuckPal` - money transfers between accounts
//!
//! The application core of a small banking service: an account domain
//! model built from a baseline balance plus a window of recent activities,
//! and a send-money use case that moves money between two accounts while
//! holding exclusive, deadlock-free locks on both.
//!
//! Persistence is reached only through the traits in [`ports`]; the
//! `buckpal-memory` crate provides an in-memory adapter.
//!
//! ```rust,ignore
//! let service = TransferService::new(store.clone(), store, TransferConfig::default());
//! let command = SendMoneyCommand::new(source, target, Money::of(500))?;
//! let receipt = service.transfer(command).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod activity;
pub mod activity_window;
pub mod balance;
pub mod clock;
pub mod command;
pub mod config;
pub mod errors;
pub mod locking;
pub mod money;
pub mod ports;
pub mod transfer;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use account::{Account, AccountError};
pub use activity::{Activity, ActivityError};
pub use activity_window::{ActivityWindow, ActivityWindowError};
pub use balance::GetAccountBalanceService;
pub use clock::{Clock, SystemClock};
pub use command::SendMoneyCommand;
pub use config::{BaselineWindowDays, LockWaitMs, TransferConfig};
pub use errors::{TransferError, TransferResult};
pub use locking::{AccountLockGuard, AccountLockSet, AccountLocks, LockTimeoutError};
pub use money::{Money, MoneyError};
pub use ports::{LoadAccountError, LoadAccountPort, PersistenceError, RecordActivitiesPort};
pub use transfer::{TransferPhase, TransferReceipt, TransferService};
pub use types::{AccountId, ActivityId, Timestamp};
