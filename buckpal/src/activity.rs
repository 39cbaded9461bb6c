//! A single leg of a money transfer.

use crate::money::Money;
use crate::types::{AccountId, ActivityId, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing an [`Activity`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ActivityError {
    /// Activity amounts carry no sign; direction comes from source and target.
    #[error("activity amount must not be negative, got {0}")]
    NegativeAmount(Money),
}

/// An immutable record of money moving from a source to a target account.
///
/// Every transfer produces two activities: one owned by the source account
/// and one owned by the target account. Each account only ever sees the
/// activities it owns, so a transfer is counted once per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: Option<ActivityId>,
    owner_account_id: AccountId,
    source_account_id: AccountId,
    target_account_id: AccountId,
    timestamp: Timestamp,
    amount: Money,
}

impl Activity {
    /// Creates an activity that has not been persisted yet.
    pub fn new(
        owner_account_id: AccountId,
        source_account_id: AccountId,
        target_account_id: AccountId,
        timestamp: Timestamp,
        amount: Money,
    ) -> Result<Self, ActivityError> {
        if amount.is_negative() {
            return Err(ActivityError::NegativeAmount(amount));
        }

        Ok(Self {
            id: None,
            owner_account_id,
            source_account_id,
            target_account_id,
            timestamp,
            amount,
        })
    }

    /// Returns this activity carrying the id assigned by persistence.
    #[must_use]
    pub const fn with_id(mut self, id: ActivityId) -> Self {
        self.id = Some(id);
        self
    }

    /// The persisted id, absent for activities not yet recorded.
    pub const fn id(&self) -> Option<ActivityId> {
        self.id
    }

    /// Account whose window this activity belongs to.
    pub const fn owner_account_id(&self) -> AccountId {
        self.owner_account_id
    }

    /// Account the money was taken from.
    pub const fn source_account_id(&self) -> AccountId {
        self.source_account_id
    }

    /// Account the money was given to.
    pub const fn target_account_id(&self) -> AccountId {
        self.target_account_id
    }

    /// When the money moved.
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// How much money moved. Never negative.
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Whether this activity has been recorded by persistence.
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
