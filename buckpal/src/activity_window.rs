//! Time-ordered slice of an account's activities.

use crate::activity::Activity;
use crate::money::{Money, MoneyError};
use crate::types::{AccountId, Timestamp};
use thiserror::Error;

/// Errors raised when appending to an [`ActivityWindow`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivityWindowError {
    /// The activity would break the ascending timestamp order.
    #[error("activity at {attempted} is older than the latest activity at {latest}")]
    OutOfOrder {
        /// Timestamp of the rejected activity
        attempted: Timestamp,
        /// Timestamp of the newest activity already in the window
        latest: Timestamp,
    },

    /// The activity predates the window's baseline date.
    #[error("activity at {attempted} is older than the window baseline {baseline}")]
    BeforeBaseline {
        /// Timestamp of the rejected activity
        attempted: Timestamp,
        /// First instant the window covers
        baseline: Timestamp,
    },
}

/// The activities of an account since some baseline date, oldest first.
///
/// The window only grows: activities are appended, never removed or
/// reordered once inside. A window built with [`ActivityWindow::since`]
/// remembers its baseline date and refuses anything older.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityWindow {
    baseline: Option<Timestamp>,
    activities: Vec<Activity>,
}

impl ActivityWindow {
    /// Creates a window from a batch of activities in any order.
    ///
    /// Activities are sorted by timestamp; ties keep their given order.
    pub fn new(activities: impl IntoIterator<Item = Activity>) -> Self {
        let mut activities: Vec<Activity> = activities.into_iter().collect();
        activities.sort_by_key(Activity::timestamp);
        Self {
            baseline: None,
            activities,
        }
    }

    /// Creates a window covering everything from `baseline` on.
    ///
    /// Fails if any activity is older than `baseline`.
    pub fn since(
        baseline: Timestamp,
        activities: impl IntoIterator<Item = Activity>,
    ) -> Result<Self, ActivityWindowError> {
        let mut window = Self::new(activities);
        if let Some(oldest) = window.start_timestamp() {
            if oldest < baseline {
                return Err(ActivityWindowError::BeforeBaseline {
                    attempted: oldest,
                    baseline,
                });
            }
        }
        window.baseline = Some(baseline);
        Ok(window)
    }

    /// An empty window.
    pub const fn empty() -> Self {
        Self {
            baseline: None,
            activities: Vec::new(),
        }
    }

    /// The baseline date the window was built from, if it has one.
    pub const fn baseline(&self) -> Option<Timestamp> {
        self.baseline
    }

    /// Timestamp of the oldest activity, if any.
    pub fn start_timestamp(&self) -> Option<Timestamp> {
        self.activities.first().map(Activity::timestamp)
    }

    /// Timestamp of the newest activity, if any.
    pub fn end_timestamp(&self) -> Option<Timestamp> {
        self.activities.last().map(Activity::timestamp)
    }

    /// Net effect of the window on `account_id`.
    ///
    /// Deposits into the account count positive, withdrawals from it count
    /// negative. A self-transfer counts as both and nets to zero.
    pub fn calculate_balance(&self, account_id: AccountId) -> Result<Money, MoneyError> {
        self.activities
            .iter()
            .try_fold(Money::zero(), |balance, activity| {
                let mut balance = balance;
                if activity.target_account_id() == account_id {
                    balance = balance.add(activity.amount())?;
                }
                if activity.source_account_id() == account_id {
                    balance = balance.subtract(activity.amount())?;
                }
                Ok(balance)
            })
    }

    /// Appends an activity at the end of the window.
    pub fn add_activity(&mut self, activity: Activity) -> Result<(), ActivityWindowError> {
        if let Some(baseline) = self.baseline {
            if activity.timestamp() < baseline {
                return Err(ActivityWindowError::BeforeBaseline {
                    attempted: activity.timestamp(),
                    baseline,
                });
            }
        }
        if let Some(latest) = self.end_timestamp() {
            if activity.timestamp() < latest {
                return Err(ActivityWindowError::OutOfOrder {
                    attempted: activity.timestamp(),
                    latest,
                });
            }
        }
        self.activities.push(activity);
        Ok(())
    }

    /// Iterates the activities oldest first.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> + '_ {
        self.activities.iter()
    }

    /// Number of activities in the window.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the window holds no activities.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
