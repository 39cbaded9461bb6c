//! Property tests for the global lock order.

use buckpal::locking::lock_order;
use buckpal::testing::prelude::*;
use buckpal::AccountLocks;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::time::Duration;

proptest! {
    /// Locks are taken strictly ascending, each account exactly once.
    #[test]
    fn lock_order_is_strictly_ascending(ids in prop::collection::vec(arb_account_id(), 1..10)) {
        let ordered = lock_order(&ids);

        prop_assert!(ordered.windows(2).all(|pair| pair[0] < pair[1]));
        let expected: BTreeSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(ordered, expected.into_iter().collect::<Vec<_>>());
    }

    /// The order does not depend on how the accounts were listed.
    #[test]
    fn lock_order_ignores_argument_order((a, b) in arb_distinct_account_ids()) {
        prop_assert_eq!(lock_order(&[a, b]), lock_order(&[b, a]));
    }

    /// Acquiring follows the lock order and dropping releases everything.
    #[test]
    fn acquired_locks_follow_the_order(ids in prop::collection::vec(arb_account_id(), 1..6)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let locks = AccountLocks::new();
            let held = locks
                .acquire_ordered(&ids, Duration::from_millis(100))
                .await
                .unwrap();

            prop_assert_eq!(held.accounts(), lock_order(&ids));
            for id in &ids {
                prop_assert!(locks.is_locked(*id));
            }

            drop(held);
            prop_assert_eq!(locks.entry_count(), 0);
            Ok(())
        })?;
    }
}
