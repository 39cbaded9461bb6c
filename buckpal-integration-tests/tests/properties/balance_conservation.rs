//! Property tests for balances under arbitrary transfer sequences.
//!
//! A sequence of transfers between a few accounts is run against the
//! store and checked against a plain model of the balances.

use crate::common::Bank;
use buckpal::testing::prelude::*;
use buckpal::TransferError;
use proptest::prelude::*;

const ACCOUNTS: u64 = 3;

fn arb_transfer() -> impl Strategy<Value = (u64, u64, i64)> {
    (1..=ACCOUNTS, 1..=ACCOUNTS, 1i64..=600)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Total money is conserved and no balance ever goes negative.
    #[test]
    fn transfers_conserve_money_and_never_overdraw(
        opening in prop::collection::vec(0i64..=1_000, ACCOUNTS as usize),
        transfers in prop::collection::vec(arb_transfer(), 1..25),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let bank = Bank::new();
            let mut model = opening.clone();
            for (index, balance) in opening.iter().enumerate() {
                bank.open(index as u64 + 1, *balance);
            }
            let total: i64 = opening.iter().sum();

            for (source, target, amount) in transfers {
                let result = bank.send(source, target, amount).await;
                let source_balance = model[source as usize - 1];

                if source_balance >= amount {
                    prop_assert!(result.is_ok(), "transfer should commit: {:?}", result);
                    model[source as usize - 1] -= amount;
                    model[target as usize - 1] += amount;
                } else {
                    let refused = matches!(result, Err(TransferError::InsufficientFunds { .. }));
                    prop_assert!(refused);
                }
            }

            let mut sum = 0;
            for id in 1..=ACCOUNTS {
                let balance = bank.balance(id).await;
                prop_assert!(!balance.is_negative());
                prop_assert_eq!(balance, Money::of(model[id as usize - 1]));
                sum += balance.minor_units();
            }
            prop_assert_eq!(sum, total);
            prop_assert_eq!(bank.transfers.locks().entry_count(), 0);
            Ok(())
        })?;
    }

    /// A failed transfer leaves every balance as it was.
    #[test]
    fn refused_transfers_change_nothing(
        balance in 0i64..1_000,
        excess in 1i64..1_000,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let bank = Bank::new();
            bank.open(1, balance);
            bank.open(2, 0);

            let result = bank.send(1, 2, balance + excess).await;

            prop_assert!(
                matches!(result, Err(TransferError::InsufficientFunds { .. })),
                "overdraft must be refused"
            );
            prop_assert_eq!(bank.balance(1).await, Money::of(balance));
            prop_assert_eq!(bank.balance(2).await, Money::zero());
            prop_assert!(bank.store.recorded_activities().is_empty());
            Ok(())
        })?;
    }
}
