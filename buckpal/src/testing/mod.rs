//! Testing utilities for the BuckPal transfer core.
//!
//! Enabled with the `testing` feature (and always inside this crate's own
//! unit tests).
//!
//! - [`builders`]: fluent builders for accounts and activities with
//!   sensible defaults
//! - [`generators`]: `proptest` strategies for domain values
//! - [`FixedClock`]: a clock frozen at a chosen instant
//!
//! ```rust,ignore
//! use buckpal::testing::prelude::*;
//!
//! let account = AccountBuilder::new()
//!     .with_id(account_id(1))
//!     .with_baseline_balance(Money::of(1_000))
//!     .build();
//! ```

pub mod builders;
pub mod generators;

use crate::clock::Clock;
use crate::types::{AccountId, Timestamp};
use chrono::{TimeZone, Utc};

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    time: Timestamp,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    pub const fn new(time: Timestamp) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.time
    }
}

/// Builds an account id from a literal, panicking on zero.
pub fn account_id(raw: u64) -> AccountId {
    AccountId::try_new(raw).expect("test account ids must be positive")
}

/// Midnight UTC of the given day in August 2018, the default test month.
pub fn august(day: u32) -> Timestamp {
    Timestamp::new(
        Utc.with_ymd_and_hms(2018, 8, day, 0, 0, 0)
            .single()
            .expect("test dates must exist"),
    )
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::builders::{AccountBuilder, ActivityBuilder};
    pub use super::generators::{
        arb_account_id, arb_distinct_account_ids, arb_money, arb_non_negative_money,
        arb_positive_money,
    };
    pub use super::{account_id, august, FixedClock};
    pub use crate::money::Money;
}
