//! Custody of caller funds during a lock.
//!
//! `lock_and_earn` pulls the caller's stake token and native SOL into custody
//! accounts owned by the custody authority PDA before the adapter call. The
//! pull hands back a `CustodyReceipt`; the only way to consume it is `settle`,
//! which yields the refund owed to the caller for whatever the adapter did not
//! spend. Any error before settlement aborts the transaction, and the runtime
//! reverts the pull together with everything else.

use anchor_lang::prelude::*;

use crate::error::LockerError;

/// Funds held in custody on behalf of the caller
#[must_use = "custody must be settled so unspent funds return to the caller"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustodyReceipt {
    stake_pulled: u64,
    native_pulled: u64,
}

/// Amounts owed back to the caller after provisioning
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Refund {
    pub stake: u64,
    pub native: u64,
}

impl Refund {
    pub fn is_empty(&self) -> bool {
        self.stake == 0 && self.native == 0
    }
}

impl CustodyReceipt {
    pub fn new(stake_pulled: u64, native_pulled: u64) -> Self {
        Self {
            stake_pulled,
            native_pulled,
        }
    }

    /// Close the receipt against what the adapter actually spent.
    ///
    /// Spending more than was pulled means the adapter drew on funds it was
    /// never given, which is treated as a provisioning failure.
    pub fn settle(self, stake_spent: u64, native_spent: u64) -> Result<Refund> {
        let stake = self
            .stake_pulled
            .checked_sub(stake_spent)
            .ok_or(LockerError::ProvisioningFailed)?;
        let native = self
            .native_pulled
            .checked_sub(native_spent)
            .ok_or(LockerError::ProvisioningFailed)?;

        Ok(Refund { stake, native })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_returns_unspent_funds() {
        let receipt = CustodyReceipt::new(1_000, 500);
        let refund = receipt.settle(900, 500).unwrap();

        assert_eq!(refund, Refund { stake: 100, native: 0 });
        assert!(!refund.is_empty());
    }

    #[test]
    fn fully_spent_custody_owes_nothing() {
        let refund = CustodyReceipt::new(10, 10).settle(10, 10).unwrap();
        assert!(refund.is_empty());
    }

    #[test]
    fn overspend_is_a_provisioning_failure() {
        assert!(CustodyReceipt::new(10, 10).settle(11, 0).is_err());
        assert!(CustodyReceipt::new(10, 10).settle(0, 11).is_err());
    }
}
