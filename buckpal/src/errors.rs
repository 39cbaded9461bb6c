//! Error types for the transfer use case.
//!
//! Each layer has its own error enum (`MoneyError`, `AccountError`, the
//! port errors). [`TransferError`] is what callers of the transfer service
//! see; lower-level errors convert into it so the service can use `?`.
//!
//! # Error Handling Strategy
//!
//! - **InvalidAmount** / **ThresholdExceeded**: fix the input, do not retry
//! - **InsufficientFunds**: expected business outcome, report to the user
//! - **AccountNotFound**: check the account ids
//! - **LockTimeout**: another transfer holds an account, retry later
//! - **PersistenceFailure**: the transfer did not commit; retry is safe only
//!   if the caller knows the store recorded nothing
//! - **ArithmeticOverflow** / **InvalidState**: log and investigate

use crate::account::AccountError;
use crate::locking::LockTimeoutError;
use crate::money::{Money, MoneyError};
use crate::ports::{LoadAccountError, PersistenceError};
use crate::transfer::TransferPhase;
use crate::types::AccountId;
use std::time::Duration;
use thiserror::Error;

/// Result type for the transfer use case.
pub type TransferResult<T> = Result<T, TransferError>;

/// Why a transfer did not commit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The amount to send is zero or negative.
    #[error("transfer amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// The amount to send is above the configured maximum.
    #[error("transfer of {requested} exceeds the maximum of {threshold}")]
    ThresholdExceeded {
        /// Configured maximum transfer amount
        threshold: Money,
        /// Amount that was requested
        requested: Money,
    },

    /// The source account cannot cover the amount.
    #[error("insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account with insufficient funds
        account: AccountId,
        /// Current balance
        balance: Money,
        /// Requested amount
        requested: Money,
    },

    /// One of the accounts does not exist.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// An account lock could not be acquired in time.
    #[error("timed out after {waited:?} waiting for the lock on account {account}")]
    LockTimeout {
        /// Account whose lock was not acquired
        account: AccountId,
        /// How long the service waited
        waited: Duration,
    },

    /// Recording the transfer's activities failed; the transfer did not commit.
    #[error("transfer not committed, recording activities failed after {phase}: {source}")]
    PersistenceFailure {
        /// Last phase the transfer reached before the failed write
        phase: TransferPhase,
        /// Error reported by the store
        source: PersistenceError,
    },

    /// Money arithmetic overflowed while computing balances.
    #[error(transparent)]
    ArithmeticOverflow(#[from] MoneyError),

    /// Loading an account failed for a reason other than absence.
    #[error("loading account failed: {0}")]
    LoadFailure(String),

    /// A loaded account or activity violated a domain invariant.
    #[error("invalid account state: {0}")]
    InvalidState(String),
}

impl TransferError {
    /// Whether retrying the same transfer later may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LockTimeout { .. } | Self::LoadFailure(_) | Self::PersistenceFailure { .. }
        )
    }
}

impl From<LoadAccountError> for TransferError {
    fn from(error: LoadAccountError) -> Self {
        match error {
            LoadAccountError::NotFound(account) => Self::AccountNotFound(account),
            LoadAccountError::Unavailable(detail) => Self::LoadFailure(detail),
        }
    }
}

impl From<LockTimeoutError> for TransferError {
    fn from(error: LockTimeoutError) -> Self {
        Self::LockTimeout {
            account: error.account,
            waited: error.waited,
        }
    }
}

impl From<AccountError> for TransferError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::Money(money) => Self::ArithmeticOverflow(money),
            other => Self::InvalidState(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity_window::ActivityWindowError;
    use crate::types::Timestamp;

    fn account(raw: u64) -> AccountId {
        AccountId::try_new(raw).unwrap()
    }

    #[test]
    fn insufficient_funds_message() {
        let error = TransferError::InsufficientFunds {
            account: account(1),
            balance: Money::of(10_000),
            requested: Money::of(50_000),
        };
        insta::assert_snapshot!(
            error.to_string(),
            @"insufficient funds in account 1: balance 100.00, requested 500.00"
        );
    }

    #[test]
    fn persistence_failure_message_names_phase() {
        let error = TransferError::PersistenceFailure {
            phase: TransferPhase::Deposited,
            source: PersistenceError::WriteFailed("disk full".to_string()),
        };
        insta::assert_snapshot!(
            error.to_string(),
            @"transfer not committed, recording activities failed after deposited: activities could not be recorded: disk full"
        );
    }

    #[test]
    fn not_found_maps_to_account_not_found() {
        let error = TransferError::from(LoadAccountError::NotFound(account(9)));
        assert_eq!(error, TransferError::AccountNotFound(account(9)));
    }

    #[test]
    fn account_overflow_maps_to_arithmetic_overflow() {
        let error = TransferError::from(AccountError::Money(MoneyError::ArithmeticOverflow {
            operation: "add",
        }));
        assert!(matches!(error, TransferError::ArithmeticOverflow(_)));
    }

    #[test]
    fn window_error_maps_to_invalid_state() {
        let now = Timestamp::now();
        let error = TransferError::from(AccountError::Window(ActivityWindowError::OutOfOrder {
            attempted: now,
            latest: now,
        }));
        assert!(matches!(error, TransferError::InvalidState(_)));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(TransferError::LockTimeout {
            account: account(1),
            waited: Duration::from_millis(5),
        }
        .is_retryable());
        assert!(!TransferError::InvalidAmount(Money::zero()).is_retryable());
        assert!(!TransferError::AccountNotFound(account(1)).is_retryable());
    }
}
