//! Exact monetary amounts.
//!
//! `Money` counts minor currency units (cents) in a signed 64-bit integer.
//! There is no floating point anywhere; every operation that could leave
//! the representable range reports [`MoneyError::ArithmeticOverflow`]
//! instead of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Errors that can occur when doing arithmetic on [`Money`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// The result does not fit in the representable range.
    #[error("money arithmetic overflowed: {operation}")]
    ArithmeticOverflow {
        /// The operation that overflowed
        operation: &'static str,
    },
}

/// A signed amount of money in minor currency units.
///
/// Equality and ordering are total. Values are immutable; every operation
/// returns a new `Money`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero money value
    pub const ZERO: Self = Self(0);

    /// Creates money from a count of minor units (e.g. `1234` is `12.34`).
    pub const fn of(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Zero money value
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Returns the amount in minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Adds two amounts.
    pub fn add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MoneyError::ArithmeticOverflow { operation: "add" })
    }

    /// Subtracts `other` from this amount.
    pub fn subtract(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MoneyError::ArithmeticOverflow {
                operation: "subtract",
            })
    }

    /// Returns the additive inverse.
    pub fn negate(self) -> Result<Self, MoneyError> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or(MoneyError::ArithmeticOverflow {
                operation: "negate",
            })
    }

    /// True iff the amount is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True iff the amount is zero or more.
    pub const fn is_positive_or_zero(self) -> bool {
        self.0 >= 0
    }

    /// True iff the amount is strictly below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}
