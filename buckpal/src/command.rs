//! Input of the send-money use case.
//!
//! Input validation happens here, when the command is built. The transfer
//! service can then rely on a positive amount without checking again.

use crate::errors::TransferError;
use crate::money::Money;
use crate::types::AccountId;
use serde::Serialize;

/// A request to move money from one account to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendMoneyCommand {
    source_account_id: AccountId,
    target_account_id: AccountId,
    amount: Money,
}

impl SendMoneyCommand {
    /// Creates a validated command.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidAmount`] if `amount` is zero or negative.
    pub fn new(
        source_account_id: AccountId,
        target_account_id: AccountId,
        amount: Money,
    ) -> Result<Self, TransferError> {
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount(amount));
        }

        Ok(Self {
            source_account_id,
            target_account_id,
            amount,
        })
    }

    /// Account to take the money from.
    pub const fn source_account_id(&self) -> AccountId {
        self.source_account_id
    }

    /// Account to give the money to.
    pub const fn target_account_id(&self) -> AccountId {
        self.target_account_id
    }

    /// Amount to move. Always positive.
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Whether source and target are the same account.
    pub fn is_self_transfer(&self) -> bool {
        self.source_account_id == self.target_account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(raw: u64) -> AccountId {
        AccountId::try_new(raw).unwrap()
    }

    #[test]
    fn rejects_zero_amount() {
        let result = SendMoneyCommand::new(account(1), account(2), Money::zero());
        assert_eq!(result, Err(TransferError::InvalidAmount(Money::zero())));
    }

    #[test]
    fn rejects_negative_amount() {
        let result = SendMoneyCommand::new(account(1), account(2), Money::of(-5));
        assert_eq!(result, Err(TransferError::InvalidAmount(Money::of(-5))));
    }

    #[test]
    fn accepts_positive_amount() {
        let command = SendMoneyCommand::new(account(1), account(2), Money::of(500)).unwrap();
        assert_eq!(command.amount(), Money::of(500));
        assert!(!command.is_self_transfer());
    }

    #[test]
    fn self_transfer_is_detected() {
        let command = SendMoneyCommand::new(account(4), account(4), Money::of(1)).unwrap();
        assert!(command.is_self_transfer());
    }
}
