//! Validated configuration for the transfer use case.
//!
//! Every parameter is a `nutype` newtype checked at construction, so a
//! `TransferConfig` that exists is a usable one.

use crate::money::Money;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a transfer waits for each account lock, in milliseconds.
///
/// Validated to be between 1ms and 60 seconds so a transfer can neither
/// skip waiting entirely nor block a caller indefinitely.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 60_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct LockWaitMs(u64);

impl LockWaitMs {
    /// Convert to Duration for use with `tokio::time::timeout`.
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.into())
    }
}

/// Number of days of activity loaded into an account's window.
///
/// Older activity is folded into the account's baseline balance.
/// Validated to be between 1 day and 10 years.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 3_650),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct BaselineWindowDays(u32);

/// Settings for the transfer and balance services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Bounded wait for each account lock.
    pub lock_wait: LockWaitMs,
    /// Days of activity kept in a loaded account's window.
    pub baseline_window: BaselineWindowDays,
    /// Largest amount a single transfer may move; `None` means unlimited.
    pub maximum_transfer: Option<Money>,
}

impl TransferConfig {
    /// Creates a configuration with safe defaults.
    ///
    /// Locks wait up to 5 seconds, windows span 10 days and a single
    /// transfer may move at most 1,000,000 minor units.
    ///
    /// # Errors
    ///
    /// Returns validation errors if any of the default values are invalid
    /// (which should never happen with proper constants).
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            lock_wait: LockWaitMs::try_new(5_000)?,
            baseline_window: BaselineWindowDays::try_new(10)?,
            maximum_transfer: Some(Money::of(1_000_000)),
        })
    }

    /// Create a configuration for tests: short lock waits and no threshold.
    pub fn for_testing() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            lock_wait: LockWaitMs::try_new(250)?,
            baseline_window: BaselineWindowDays::try_new(10)?,
            maximum_transfer: None,
        })
    }

    /// Returns a copy with a different lock wait.
    #[must_use]
    pub const fn with_lock_wait(mut self, lock_wait: LockWaitMs) -> Self {
        self.lock_wait = lock_wait;
        self
    }

    /// Returns a copy with a different baseline window.
    #[must_use]
    pub const fn with_baseline_window(mut self, baseline_window: BaselineWindowDays) -> Self {
        self.baseline_window = baseline_window;
        self
    }

    /// Returns a copy with a different transfer threshold.
    #[must_use]
    pub const fn with_maximum_transfer(mut self, maximum_transfer: Option<Money>) -> Self {
        self.maximum_transfer = maximum_transfer;
        self
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new().expect("Default transfer configuration should always be valid")
    }
}
