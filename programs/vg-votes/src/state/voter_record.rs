use anchor_lang::prelude::*;

use crate::error::VotesError;

/// Where a holder's own voting power currently counts
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VotingStatus {
    /// No voting power; the record may still hold power delegated to it
    #[default]
    Unregistered,
    /// Own power counts for the holder
    Active,
    /// Own power counts for `delegatee`
    Delegated,
}

/// Whether the snapshot still matches the holder's VG balance and the rate
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Freshness {
    #[default]
    Fresh,
    Stale,
}

/// A balance snapshot taken at `slot` under `rate_version`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub power: u64,
    pub balance: u64,
    pub rate_version: u32,
    pub slot: u64,
}

/// Read-only voting power of a holder, returned by `get_voting_power`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VotingPowerView {
    pub own_power: u64,
    pub received_power: u64,
    pub effective_power: u64,
    pub status: VotingStatus,
    pub delegatee: Option<Pubkey>,
    pub fresh: bool,
}

/// Per-holder voting record
/// PDA: ["voter", voting_wrapper, holder]
///
/// Voting power is never held in custody: the VG stays in the holder's
/// wallet and the record only snapshots it. A snapshot goes stale as soon as
/// the balance or the exchange rate moves; anyone can refresh it.
#[account]
#[derive(Default, Debug)]
pub struct VoterRecord {
    /// The voting wrapper this record belongs to
    pub wrapper: Pubkey,

    /// Holder of the VG backing this record
    pub holder: Pubkey,

    pub status: VotingStatus,

    /// Target of the delegation while Delegated, default otherwise
    pub delegatee: Pubkey,

    /// Own voting power from the last snapshot
    pub voting_power: u64,

    /// Power added to the delegatee's `received_power` by this record
    pub delegated_power: u64,

    /// Sum of the power other holders delegated to this one
    pub received_power: u64,

    pub snapshot_balance: u64,
    pub snapshot_rate_version: u32,
    pub snapshot_slot: u64,

    pub freshness: Freshness,

    /// PDA bump seed
    pub bump: u8,
}

impl VoterRecord {
    /// Account size for allocation
    pub const SIZE: usize = 8 + // discriminator
        32 + // wrapper
        32 + // holder
        1 +  // status
        32 + // delegatee
        8 +  // voting_power
        8 +  // delegated_power
        8 +  // received_power
        8 +  // snapshot_balance
        4 +  // snapshot_rate_version
        8 +  // snapshot_slot
        1 +  // freshness
        1 +  // bump
        32;  // padding for future fields

    pub fn is_registered(&self) -> bool {
        self.status != VotingStatus::Unregistered
    }

    /// Power this holder can vote with right now.
    /// Own power only counts while Active; received power always counts.
    pub fn effective_power(&self) -> Result<u64> {
        let own = match self.status {
            VotingStatus::Active => self.voting_power,
            VotingStatus::Unregistered | VotingStatus::Delegated => 0,
        };

        own.checked_add(self.received_power)
            .ok_or(error!(VotesError::MathOverflow))
    }

    pub fn view(&self, vg_balance: u64, rate_version: u32) -> Result<VotingPowerView> {
        Ok(VotingPowerView {
            own_power: self.voting_power,
            received_power: self.received_power,
            effective_power: self.effective_power()?,
            status: self.status,
            delegatee: (self.status == VotingStatus::Delegated).then_some(self.delegatee),
            fresh: self.freshness_for(vg_balance, rate_version) == Freshness::Fresh,
        })
    }

    /// Freshness of the snapshot against a live balance and rate version
    pub fn freshness_for(&self, vg_balance: u64, rate_version: u32) -> Freshness {
        if !self.is_registered() {
            return Freshness::Fresh;
        }

        if vg_balance == self.snapshot_balance && rate_version == self.snapshot_rate_version {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }

    /// Store the freshness flag. Returns the new value.
    pub fn sync_freshness(&mut self, vg_balance: u64, rate_version: u32) -> Freshness {
        self.freshness = self.freshness_for(vg_balance, rate_version);
        self.freshness
    }

    /// Replace the snapshot. Returns the previous own power.
    fn take_snapshot(&mut self, snapshot: &Snapshot) -> u64 {
        let previous = self.voting_power;

        self.voting_power = snapshot.power;
        self.snapshot_balance = snapshot.balance;
        self.snapshot_rate_version = snapshot.rate_version;
        self.snapshot_slot = snapshot.slot;
        self.freshness = Freshness::Fresh;

        previous
    }

    /// Unregistered|Active -> Active. Idempotent.
    ///
    /// Returns the previous own power (0 when newly registered).
    pub fn enable(&mut self, snapshot: &Snapshot) -> Result<u64> {
        require!(
            self.status != VotingStatus::Delegated,
            VotesError::AlreadyDelegated
        );

        let previous = self.take_snapshot(snapshot);
        self.status = VotingStatus::Active;

        Ok(previous)
    }

    /// Re-snapshot a registered record.
    ///
    /// While Delegated, `delegatee` must be the current delegatee's record;
    /// its received power moves by the same difference as this record's power.
    /// Returns the previous own power.
    pub fn refresh(
        &mut self,
        snapshot: &Snapshot,
        delegatee: Option<&mut VoterRecord>,
    ) -> Result<u64> {
        require!(self.is_registered(), VotesError::NotRegistered);

        if self.status == VotingStatus::Delegated {
            let delegatee = delegatee.ok_or(VotesError::InvalidDelegatee)?;
            self.check_delegatee(delegatee)?;

            delegatee.received_power = delegatee
                .received_power
                .checked_sub(self.delegated_power)
                .ok_or(VotesError::MathUnderflow)?
                .checked_add(snapshot.power)
                .ok_or(VotesError::MathOverflow)?;
            self.delegated_power = snapshot.power;
        }

        Ok(self.take_snapshot(snapshot))
    }

    /// Active -> Unregistered. Returns the released own power.
    pub fn disable(&mut self) -> Result<u64> {
        match self.status {
            VotingStatus::Active => {}
            VotingStatus::Delegated => return err!(VotesError::AlreadyDelegated),
            VotingStatus::Unregistered => return err!(VotesError::NotActive),
        }

        let released = self.voting_power;

        self.status = VotingStatus::Unregistered;
        self.voting_power = 0;
        self.snapshot_balance = 0;
        self.freshness = Freshness::Fresh;

        Ok(released)
    }

    /// Active -> Delegated(delegatee). Returns the delegated power.
    ///
    /// Self-delegation and chains are rejected: the delegatee may not be
    /// delegating itself, and a holder that received power cannot pass it on.
    pub fn delegate(&mut self, delegatee: &mut VoterRecord) -> Result<u64> {
        require!(self.status == VotingStatus::Active, VotesError::NotActive);
        require_keys_eq!(self.wrapper, delegatee.wrapper, VotesError::InvalidWrapper);
        require_keys_neq!(self.holder, delegatee.holder, VotesError::SelfDelegation);

        require!(
            delegatee.status != VotingStatus::Delegated,
            VotesError::DelegationChain
        );
        require!(self.received_power == 0, VotesError::DelegationChain);

        let power = self.voting_power;
        delegatee.received_power = delegatee
            .received_power
            .checked_add(power)
            .ok_or(VotesError::MathOverflow)?;

        self.status = VotingStatus::Delegated;
        self.delegatee = delegatee.holder;
        self.delegated_power = power;

        Ok(power)
    }

    /// Delegated -> Active, removing exactly what `delegate` added.
    /// Returns the power taken back.
    pub fn undelegate(&mut self, delegatee: &mut VoterRecord) -> Result<u64> {
        require!(
            self.status == VotingStatus::Delegated,
            VotesError::NotDelegated
        );
        self.check_delegatee(delegatee)?;

        let power = self.delegated_power;
        delegatee.received_power = delegatee
            .received_power
            .checked_sub(power)
            .ok_or(VotesError::MathUnderflow)?;

        self.status = VotingStatus::Active;
        self.delegatee = Pubkey::default();
        self.delegated_power = 0;

        Ok(power)
    }

    fn check_delegatee(&self, delegatee: &VoterRecord) -> Result<()> {
        require_keys_eq!(self.wrapper, delegatee.wrapper, VotesError::InvalidWrapper);
        require_keys_eq!(self.delegatee, delegatee.holder, VotesError::InvalidDelegatee);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn record(holder: u8) -> VoterRecord {
        VoterRecord {
            wrapper: key(100),
            holder: key(holder),
            ..VoterRecord::default()
        }
    }

    fn snap(power: u64) -> Snapshot {
        Snapshot {
            power,
            balance: power,
            rate_version: 0,
            slot: 1,
        }
    }

    #[test]
    fn enable_is_idempotent() {
        let mut r = record(1);

        assert_eq!(r.enable(&snap(100)).unwrap(), 0);
        assert_eq!(r.enable(&snap(100)).unwrap(), 100);
        assert_eq!(r.status, VotingStatus::Active);
        assert_eq!(r.effective_power().unwrap(), 100);
    }

    #[test]
    fn received_power_survives_disable() {
        let mut a = record(1);
        let mut b = record(2);
        a.enable(&snap(40)).unwrap();
        b.enable(&snap(10)).unwrap();
        a.delegate(&mut b).unwrap();

        assert_eq!(b.disable().unwrap(), 10);
        assert_eq!(b.effective_power().unwrap(), 40);
    }

    #[test]
    fn refresh_while_delegated_moves_received_power() {
        let mut a = record(1);
        let mut b = record(2);
        a.enable(&snap(40)).unwrap();
        a.delegate(&mut b).unwrap();

        a.refresh(&snap(25), Some(&mut b)).unwrap();
        assert_eq!(b.received_power, 25);
        assert_eq!(a.delegated_power, 25);

        let mut c = record(3);
        assert!(a.refresh(&snap(30), Some(&mut c)).is_err());
        assert!(a.refresh(&snap(30), None).is_err());
    }

    #[test]
    fn staleness_follows_balance_and_rate() {
        let mut r = record(1);
        r.enable(&snap(50)).unwrap();

        assert_eq!(r.sync_freshness(50, 0), Freshness::Fresh);
        assert_eq!(r.sync_freshness(49, 0), Freshness::Stale);
        assert_eq!(r.sync_freshness(50, 1), Freshness::Stale);

        r.refresh(
            &Snapshot {
                power: 50,
                balance: 50,
                rate_version: 1,
                slot: 2,
            },
            None,
        )
        .unwrap();
        assert_eq!(r.freshness, Freshness::Fresh);
    }
}
