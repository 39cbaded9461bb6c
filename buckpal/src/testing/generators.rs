//! Property-based test generators using proptest.

use crate::money::Money;
use crate::types::AccountId;
use proptest::prelude::*;

/// Generates valid account ids in a small range so collisions happen.
pub fn arb_account_id() -> impl Strategy<Value = AccountId> {
    (1u64..=64).prop_map(|raw| AccountId::try_new(raw).expect("range starts at one"))
}

/// Generates two distinct account ids.
pub fn arb_distinct_account_ids() -> impl Strategy<Value = (AccountId, AccountId)> {
    (arb_account_id(), arb_account_id()).prop_filter("accounts must differ", |(a, b)| a != b)
}

/// Generates money in either direction, far enough from the i64 limits
/// that sums of a few values cannot overflow.
pub fn arb_money() -> impl Strategy<Value = Money> {
    (-1_000_000_000i64..=1_000_000_000).prop_map(Money::of)
}

/// Generates strictly positive money.
pub fn arb_positive_money() -> impl Strategy<Value = Money> {
    (1i64..=1_000_000_000).prop_map(Money::of)
}

/// Generates non-negative money.
pub fn arb_non_negative_money() -> impl Strategy<Value = Money> {
    (0i64..=1_000_000_000).prop_map(Money::of)
}
