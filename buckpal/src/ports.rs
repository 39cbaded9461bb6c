//! Outgoing ports of the application core.
//!
//! The transfer service never talks to storage directly. It receives
//! implementations of these traits as constructor arguments; adapters
//! such as the in-memory store in `buckpal-memory` provide them.

use crate::account::Account;
use crate::activity::Activity;
use crate::types::{AccountId, ActivityId, Timestamp};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors a [`LoadAccountPort`] can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadAccountError {
    /// No account exists with the given id.
    #[error("account {0} not found")]
    NotFound(AccountId),

    /// The backing store could not be reached or read.
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

/// Errors a [`RecordActivitiesPort`] can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The store refused or failed the write; nothing was recorded.
    #[error("activities could not be recorded: {0}")]
    WriteFailed(String),

    /// The store acknowledged fewer activities than it was given.
    #[error("store recorded {recorded} of {expected} activities")]
    Incomplete {
        /// Number of activities handed to the store
        expected: usize,
        /// Number of activities the store acknowledged
        recorded: usize,
    },
}

/// Loads an account aggregate.
#[async_trait]
pub trait LoadAccountPort: Send + Sync {
    /// Loads `account_id` with a window of activities since `baseline_date`.
    ///
    /// The returned account's baseline balance must reflect every activity
    /// before `baseline_date`; its window holds exactly the activities the
    /// account owns from `baseline_date` on.
    async fn load_account(
        &self,
        account_id: AccountId,
        baseline_date: Timestamp,
    ) -> Result<Account, LoadAccountError>;
}

/// Persists activities created by a use case.
#[async_trait]
pub trait RecordActivitiesPort: Send + Sync {
    /// Records `activities` atomically: either all of them or none.
    ///
    /// Returns the ids assigned to the activities, in the given order.
    async fn record_activities(
        &self,
        activities: &[Activity],
    ) -> Result<Vec<ActivityId>, PersistenceError>;
}

#[async_trait]
impl<T: LoadAccountPort + ?Sized> LoadAccountPort for Arc<T> {
    async fn load_account(
        &self,
        account_id: AccountId,
        baseline_date: Timestamp,
    ) -> Result<Account, LoadAccountError> {
        (**self).load_account(account_id, baseline_date).await
    }
}

#[async_trait]
impl<T: RecordActivitiesPort + ?Sized> RecordActivitiesPort for Arc<T> {
    async fn record_activities(
        &self,
        activities: &[Activity],
    ) -> Result<Vec<ActivityId>, PersistenceError> {
        (**self).record_activities(activities).await
    }
}
