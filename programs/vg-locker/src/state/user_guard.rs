// =============================================================================
// User Guard State Account
// =============================================================================
// Per-user rate limiting for lock_and_earn. The guard is consulted before any
// funds move and recorded only on the success path: a failing lock reverts
// the whole transaction, including the guard update.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::LockerError;

/// Rate limit state for one user of one locker.
///
/// PDA: ["user_guard", locker, user]
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct UserGuard {
    /// The locker this guard belongs to
    pub locker: Pubkey,

    /// The user being rate limited
    pub user: Pubkey,

    /// Unix timestamp of the user's last successful lock
    pub last_tx_timestamp: i64,

    /// Slot `tx_count_in_slot` refers to
    pub current_slot: u64,

    /// Successful locks in `current_slot`
    pub tx_count_in_slot: u16,

    /// Successful locks overall
    pub total_locks: u64,

    pub bump: u8,
}

/// Guard parameters copied from the locker configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardParams {
    pub enabled: bool,
    pub min_time_between_txs: i64,
    pub max_tx_per_block: u16,
}

impl UserGuard {
    /// Locks already performed in `slot`
    pub fn tx_count_at(&self, slot: u64) -> u16 {
        if self.current_slot == slot {
            self.tx_count_in_slot
        } else {
            0
        }
    }

    /// Fail with `RateLimited` if another lock now would break the limits
    pub fn check(&self, params: &GuardParams, now: i64, slot: u64) -> Result<()> {
        if !params.enabled {
            return Ok(());
        }

        if self.total_locks > 0 {
            let elapsed = now.saturating_sub(self.last_tx_timestamp);
            require!(
                elapsed >= params.min_time_between_txs,
                LockerError::RateLimited
            );
        }

        require!(
            self.tx_count_at(slot) < params.max_tx_per_block,
            LockerError::RateLimited
        );

        Ok(())
    }

    /// Record a lock at (`now`, `slot`)
    pub fn record(&mut self, now: i64, slot: u64) -> Result<()> {
        let count = self
            .tx_count_at(slot)
            .checked_add(1)
            .ok_or(LockerError::MathOverflow)?;
        let total_locks = self
            .total_locks
            .checked_add(1)
            .ok_or(LockerError::MathOverflow)?;

        self.current_slot = slot;
        self.tx_count_in_slot = count;
        self.last_tx_timestamp = now;
        self.total_locks = total_locks;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: GuardParams = GuardParams {
        enabled: true,
        min_time_between_txs: 0,
        max_tx_per_block: 2,
    };

    #[test]
    fn counter_resets_on_new_slot() {
        let mut guard = UserGuard::default();

        guard.record(100, 7).unwrap();
        guard.record(100, 7).unwrap();
        assert_eq!(guard.tx_count_at(7), 2);
        assert!(guard.check(&PARAMS, 100, 7).is_err());

        assert_eq!(guard.tx_count_at(8), 0);
        guard.check(&PARAMS, 100, 8).unwrap();

        guard.record(101, 8).unwrap();
        assert_eq!(guard.current_slot, 8);
        assert_eq!(guard.tx_count_in_slot, 1);
        assert_eq!(guard.total_locks, 3);
    }

    #[test]
    fn first_lock_ignores_time_window() {
        let guard = UserGuard::default();
        let params = GuardParams {
            min_time_between_txs: 1_000,
            ..PARAMS
        };

        guard.check(&params, 5, 1).unwrap();
    }

    #[test]
    fn clock_going_backwards_is_rate_limited() {
        let mut guard = UserGuard::default();
        let params = GuardParams {
            min_time_between_txs: 1,
            ..PARAMS
        };

        guard.record(500, 1).unwrap();
        assert!(guard.check(&params, 400, 2).is_err());
    }
}
