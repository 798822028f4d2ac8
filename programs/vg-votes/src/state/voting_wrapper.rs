use anchor_lang::prelude::*;

use crate::constants::{MAX_EXCHANGE_RATE, RATE_PRECISION};
use crate::error::VotesError;
use crate::state::Snapshot;

/// Voting-power wrapper over the VG token
/// PDA: ["voting_wrapper", vg_mint]
#[account]
#[derive(Default, Debug)]
pub struct VotingWrapper {
    /// Authority who can change the exchange rate
    pub authority: Pubkey,

    /// VG token mint voting power is derived from
    pub vg_mint: Pubkey,

    /// Voting power per VG, scaled by RATE_PRECISION
    pub exchange_rate: u64,

    /// Bumped on every rate change; snapshots taken under an older version are stale
    pub rate_version: u32,

    /// Sum of the own voting power of every registered holder
    pub total_voting_power: u64,

    /// Holders currently Active or Delegated
    pub registered_voters: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl VotingWrapper {
    /// Account size for allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // vg_mint
        8 +  // exchange_rate
        4 +  // rate_version
        8 +  // total_voting_power
        8 +  // registered_voters
        1 +  // bump
        32;  // padding for future fields

    pub fn validate_rate(rate: u64) -> Result<()> {
        require!(
            rate > 0 && rate <= MAX_EXCHANGE_RATE,
            VotesError::InvalidExchangeRate
        );
        Ok(())
    }

    /// Voting power for a VG balance at the current rate
    /// Formula: power = balance * exchange_rate / RATE_PRECISION (floor)
    pub fn power_for(&self, vg_balance: u64) -> Result<u64> {
        let power = (vg_balance as u128)
            .checked_mul(self.exchange_rate as u128)
            .ok_or(VotesError::MathOverflow)?
            .checked_div(RATE_PRECISION)
            .ok_or(VotesError::DivisionByZero)?;

        u64::try_from(power).map_err(|_| error!(VotesError::MathOverflow))
    }

    /// Snapshot of a holder's VG balance at the current rate and version
    pub fn snapshot(&self, vg_balance: u64, slot: u64) -> Result<Snapshot> {
        Ok(Snapshot {
            power: self.power_for(vg_balance)?,
            balance: vg_balance,
            rate_version: self.rate_version,
            slot,
        })
    }

    /// Set a new exchange rate and invalidate every existing snapshot
    pub fn set_exchange_rate(&mut self, rate: u64) -> Result<()> {
        Self::validate_rate(rate)?;

        self.rate_version = self
            .rate_version
            .checked_add(1)
            .ok_or(VotesError::MathOverflow)?;
        self.exchange_rate = rate;

        Ok(())
    }

    /// Replace `previous` own power of a holder with `current` in the total
    pub fn apply_power_change(&mut self, previous: u64, current: u64) -> Result<()> {
        self.total_voting_power = self
            .total_voting_power
            .checked_sub(previous)
            .ok_or(VotesError::MathUnderflow)?
            .checked_add(current)
            .ok_or(VotesError::MathOverflow)?;
        Ok(())
    }

    pub fn register_voter(&mut self) -> Result<()> {
        self.registered_voters = self
            .registered_voters
            .checked_add(1)
            .ok_or(VotesError::MathOverflow)?;
        Ok(())
    }

    pub fn unregister_voter(&mut self) -> Result<()> {
        self.registered_voters = self
            .registered_voters
            .checked_sub(1)
            .ok_or(VotesError::MathUnderflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_EXCHANGE_RATE;

    fn wrapper(rate: u64) -> VotingWrapper {
        VotingWrapper {
            exchange_rate: rate,
            ..VotingWrapper::default()
        }
    }

    #[test]
    fn default_rate_is_one_to_one() {
        assert_eq!(wrapper(DEFAULT_EXCHANGE_RATE).power_for(5_000).unwrap(), 5_000);
    }

    #[test]
    fn power_is_floored() {
        // 1.5 votes per VG
        let w = wrapper(1_500_000_000);
        assert_eq!(w.power_for(3).unwrap(), 4);
        assert_eq!(w.power_for(1).unwrap(), 1);
    }

    #[test]
    fn rate_change_bumps_version() {
        let mut w = wrapper(DEFAULT_EXCHANGE_RATE);
        w.set_exchange_rate(2_000_000_000).unwrap();
        assert_eq!(w.rate_version, 1);
        assert_eq!(w.power_for(10).unwrap(), 20);

        assert!(w.set_exchange_rate(0).is_err());
        assert!(w.set_exchange_rate(MAX_EXCHANGE_RATE + 1).is_err());
        assert_eq!(w.rate_version, 1);
    }

    #[test]
    fn total_power_tracks_changes() {
        let mut w = wrapper(DEFAULT_EXCHANGE_RATE);
        w.apply_power_change(0, 100).unwrap();
        w.apply_power_change(0, 50).unwrap();
        w.apply_power_change(100, 30).unwrap();
        assert_eq!(w.total_voting_power, 80);

        assert!(w.apply_power_change(81, 0).is_err());
    }
}
