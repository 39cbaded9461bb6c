//! Core identifier and time types for the BuckPal transfer core.
//!
//! Identifiers use smart constructors so an `AccountId` or `ActivityId`
//! is always valid once it exists.

use chrono::{DateTime, Duration, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Identifier of a persisted account.
///
/// Account ids are strictly positive. Their total ordering is the global
/// lock order used by the transfer service.
#[nutype(
    validate(greater_or_equal = 1),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct AccountId(u64);

/// Identifier assigned to an activity once it has been persisted.
#[nutype(
    validate(greater_or_equal = 1),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct ActivityId(u64);

/// A UTC point in time at which an activity happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a new timestamp from a UTC `DateTime`.
    pub const fn new(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp representing the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying `DateTime`.
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the timestamp lying `days` days before this one.
    ///
    /// Saturates at the earliest representable instant.
    #[must_use]
    pub fn days_before(self, days: u32) -> Self {
        self.0
            .checked_sub_signed(Duration::days(i64::from(days)))
            .map_or(Self(DateTime::<Utc>::MIN_UTC), Self)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::new(datetime)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn account_id_rejects_zero() {
        assert!(AccountId::try_new(0).is_err());
    }

    #[test]
    fn account_ids_order_numerically() {
        let low = AccountId::try_new(2).unwrap();
        let high = AccountId::try_new(10).unwrap();
        assert!(low < high);
    }

    #[test]
    fn days_before_moves_back_whole_days() {
        let at = Timestamp::new(Utc.with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap());
        let baseline = at.days_before(10);
        assert_eq!(
            baseline,
            Timestamp::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn days_before_saturates() {
        let earliest = Timestamp::new(DateTime::<Utc>::MIN_UTC);
        assert_eq!(earliest.days_before(1), earliest);
    }

    proptest! {
        #[test]
        fn account_id_accepts_positive_values(raw in 1u64..u64::MAX) {
            let id = AccountId::try_new(raw);
            prop_assert!(id.is_ok());
            prop_assert_eq!(id.unwrap().into_inner(), raw);
        }
    }
}
