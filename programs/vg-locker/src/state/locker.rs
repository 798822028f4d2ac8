// =============================================================================
// Locker State Account
// =============================================================================
// The Locker account is both the configuration record and the aggregate
// ledger of the program. It is a PDA derived from ["locker", lp_mint], so
// there is exactly one locker per LP token.
//
// Aggregates (total_locked_lp, total_reward_issued, total_reward_deposited,
// lock_count) start at zero and only ever increase.
// =============================================================================

use anchor_lang::prelude::*;

use crate::adapter::{BalanceSnapshot, ProvisionArgs, ProvisionOutcome};
use crate::constants::{BPS_DENOMINATOR, MAX_MIN_TIME_BETWEEN_TXS};
use crate::custody::{CustodyReceipt, Refund};
use crate::error::LockerError;
use crate::state::GuardParams;

/// The main Locker account.
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct Locker {
    // =========================================================================
    // Authority & Collaborators
    // =========================================================================

    /// The single account allowed to change configuration
    pub authority: Pubkey,

    /// Token users provide alongside native SOL
    pub stake_mint: Pubkey,

    /// VG reward token mint
    pub reward_mint: Pubkey,

    /// LP token minted by the liquidity pool
    pub lp_mint: Pubkey,

    /// Wrapped native mint (wSOL)
    pub native_mint: Pubkey,

    /// VG token account rewards are disbursed from
    pub reward_vault: Pubkey,

    /// Program invoked to turn (stake, native) into LP
    pub liquidity_adapter: Pubkey,

    // =========================================================================
    // Custody Accounts
    // =========================================================================

    /// Owned by the ["custody_authority", locker] PDA
    pub stake_custody: Pubkey,
    pub native_custody: Pubkey,

    /// Permanently locked LP, owned by the locker. No instruction transfers
    /// out of this account.
    pub lp_lock_vault: Pubkey,

    // =========================================================================
    // Reward Parameters
    // =========================================================================

    /// reward = lp_amount * lp_to_reward_ratio / lp_divisor (floor)
    pub lp_to_reward_ratio: u64,
    pub lp_divisor: u64,

    /// Cap on VG supply when the locker mints into the vault (0 = minting disabled)
    pub reward_supply_cap: u64,

    // =========================================================================
    // Request Bounds
    // =========================================================================

    pub min_stake_amount: u64,
    pub min_native_amount: u64,
    pub max_slippage_bps: u16,
    pub default_slippage_bps: u16,

    // =========================================================================
    // MEV Protection
    // =========================================================================

    pub mev_protection_enabled: bool,
    pub min_time_between_txs: i64,
    pub max_tx_per_user_per_block: u16,

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Sum of all LP ever locked. Never decreases.
    pub total_locked_lp: u64,

    /// Sum of all VG disbursed by lock_and_earn
    pub total_reward_issued: u64,

    /// Sum of all VG funded or minted into the vault through this program
    pub total_reward_deposited: u64,

    /// Number of successful lock_and_earn calls
    pub lock_count: u64,

    // =========================================================================
    // Status
    // =========================================================================

    pub is_paused: bool,

    /// Set while the adapter call is in flight
    pub in_flight: bool,

    // =========================================================================
    // PDA Bumps
    // =========================================================================

    pub bump: u8,
    pub stake_custody_bump: u8,
    pub native_custody_bump: u8,
    pub lp_lock_bump: u8,
    pub custody_authority_bump: u8,
}

/// Proof that the configuration authority signed the current instruction.
///
/// Only constructible from a `Signer`, so holding one means the key signed.
/// `Locker::authorize` compares it against the stored authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorityCapability {
    holder: Pubkey,
}

impl AuthorityCapability {
    pub fn from_signer(signer: &Signer<'_>) -> Self {
        Self::new(signer.key())
    }

    pub(crate) fn new(holder: Pubkey) -> Self {
        Self { holder }
    }

    pub fn holder(&self) -> Pubkey {
        self.holder
    }
}

/// Partial configuration change. `None` leaves a field untouched.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub lp_to_reward_ratio: Option<u64>,
    pub lp_divisor: Option<u64>,
    pub min_stake_amount: Option<u64>,
    pub min_native_amount: Option<u64>,
    pub max_slippage_bps: Option<u16>,
    pub default_slippage_bps: Option<u16>,
    pub mev_protection_enabled: Option<bool>,
    pub min_time_between_txs: Option<i64>,
    pub max_tx_per_user_per_block: Option<u16>,
    pub reward_supply_cap: Option<u64>,
    pub liquidity_adapter: Option<Pubkey>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Read-only copy of the full configuration record, returned by `get_config`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct LockerConfigView {
    pub authority: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub native_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub liquidity_adapter: Pubkey,
    pub lp_lock_vault: Pubkey,
    pub lp_to_reward_ratio: u64,
    pub lp_divisor: u64,
    pub reward_supply_cap: u64,
    pub min_stake_amount: u64,
    pub min_native_amount: u64,
    pub max_slippage_bps: u16,
    pub default_slippage_bps: u16,
    pub mev_protection_enabled: bool,
    pub min_time_between_txs: i64,
    pub max_tx_per_user_per_block: u16,
    pub total_locked_lp: u64,
    pub total_reward_issued: u64,
    pub total_reward_deposited: u64,
    pub lock_count: u64,
    pub is_paused: bool,
}

impl From<&Locker> for LockerConfigView {
    fn from(locker: &Locker) -> Self {
        Self {
            authority: locker.authority,
            stake_mint: locker.stake_mint,
            reward_mint: locker.reward_mint,
            lp_mint: locker.lp_mint,
            native_mint: locker.native_mint,
            reward_vault: locker.reward_vault,
            liquidity_adapter: locker.liquidity_adapter,
            lp_lock_vault: locker.lp_lock_vault,
            lp_to_reward_ratio: locker.lp_to_reward_ratio,
            lp_divisor: locker.lp_divisor,
            reward_supply_cap: locker.reward_supply_cap,
            min_stake_amount: locker.min_stake_amount,
            min_native_amount: locker.min_native_amount,
            max_slippage_bps: locker.max_slippage_bps,
            default_slippage_bps: locker.default_slippage_bps,
            mev_protection_enabled: locker.mev_protection_enabled,
            min_time_between_txs: locker.min_time_between_txs,
            max_tx_per_user_per_block: locker.max_tx_per_user_per_block,
            total_locked_lp: locker.total_locked_lp,
            total_reward_issued: locker.total_reward_issued,
            total_reward_deposited: locker.total_reward_deposited,
            lock_count: locker.lock_count,
            is_paused: locker.is_paused,
        }
    }
}

/// What one adapter call settles to: the measured outcome, the refund owed
/// to the caller and the reward earned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockSettlement {
    pub outcome: ProvisionOutcome,
    pub refund: Refund,
    pub reward: u64,
}

/// Minimum acceptable amount after applying `slippage_bps`.
///
/// Formula: amount * (10000 - slippage_bps) / 10000, rounded down
pub fn min_after_slippage(amount: u64, slippage_bps: u16) -> Result<u64> {
    require!(slippage_bps <= BPS_DENOMINATOR, LockerError::InvalidSlippage);

    let kept_bps = (BPS_DENOMINATOR - slippage_bps) as u128;
    let min = (amount as u128)
        .checked_mul(kept_bps)
        .ok_or(LockerError::MathOverflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(LockerError::DivisionByZero)?;

    u64::try_from(min).map_err(|_| error!(LockerError::MathOverflow))
}

impl Locker {
    /// Check a capability against the stored authority
    pub fn authorize(&self, capability: &AuthorityCapability) -> Result<()> {
        require_keys_eq!(
            capability.holder(),
            self.authority,
            LockerError::Unauthorized
        );
        Ok(())
    }

    /// Admission check for lock_and_earn
    pub fn check_open(&self) -> Result<()> {
        require!(!self.is_paused, LockerError::LockerPaused);
        require!(!self.in_flight, LockerError::ReentrantCall);
        Ok(())
    }

    /// Validate every parameter invariant of the configuration record
    pub fn validate_params(&self) -> Result<()> {
        require!(self.lp_to_reward_ratio > 0, LockerError::InvalidConfig);
        require!(self.lp_divisor > 0, LockerError::InvalidConfig);

        require!(
            self.max_slippage_bps > 0 && self.max_slippage_bps <= BPS_DENOMINATOR,
            LockerError::InvalidConfig
        );
        require!(
            self.default_slippage_bps > 0 && self.default_slippage_bps <= self.max_slippage_bps,
            LockerError::InvalidConfig
        );

        require!(
            (0..=MAX_MIN_TIME_BETWEEN_TXS).contains(&self.min_time_between_txs),
            LockerError::InvalidConfig
        );
        require!(self.max_tx_per_user_per_block > 0, LockerError::InvalidConfig);

        require!(
            self.liquidity_adapter != Pubkey::default(),
            LockerError::InvalidConfig
        );

        Ok(())
    }

    /// Apply an authorized configuration change.
    ///
    /// The change is built on a copy and validated as a whole, so a rejected
    /// update leaves the record untouched.
    pub fn apply_update(
        &mut self,
        capability: &AuthorityCapability,
        update: &ConfigUpdate,
    ) -> Result<()> {
        self.authorize(capability)?;
        require!(!update.is_empty(), LockerError::InvalidConfig);

        let mut next = self.clone();

        if let Some(ratio) = update.lp_to_reward_ratio {
            next.lp_to_reward_ratio = ratio;
        }
        if let Some(divisor) = update.lp_divisor {
            next.lp_divisor = divisor;
        }
        if let Some(min_stake) = update.min_stake_amount {
            next.min_stake_amount = min_stake;
        }
        if let Some(min_native) = update.min_native_amount {
            next.min_native_amount = min_native;
        }
        if let Some(max_bps) = update.max_slippage_bps {
            next.max_slippage_bps = max_bps;
        }
        if let Some(default_bps) = update.default_slippage_bps {
            next.default_slippage_bps = default_bps;
        }
        if let Some(enabled) = update.mev_protection_enabled {
            next.mev_protection_enabled = enabled;
        }
        if let Some(min_time) = update.min_time_between_txs {
            next.min_time_between_txs = min_time;
        }
        if let Some(max_tx) = update.max_tx_per_user_per_block {
            next.max_tx_per_user_per_block = max_tx;
        }
        if let Some(cap) = update.reward_supply_cap {
            next.reward_supply_cap = cap;
        }
        if let Some(adapter) = update.liquidity_adapter {
            next.liquidity_adapter = adapter;
        }

        next.validate_params()?;
        *self = next;

        Ok(())
    }

    /// Resolve the slippage for a request.
    ///
    /// `None` falls back to the default; an explicit value must be in
    /// (0, max_slippage_bps].
    pub fn resolve_slippage(&self, requested: Option<u16>) -> Result<u16> {
        match requested {
            None => Ok(self.default_slippage_bps),
            Some(bps) => {
                require!(
                    bps > 0 && bps <= self.max_slippage_bps,
                    LockerError::InvalidSlippage
                );
                Ok(bps)
            }
        }
    }

    /// Reject dust requests
    pub fn check_minimums(&self, stake_amount: u64, native_amount: u64) -> Result<()> {
        require!(
            stake_amount >= self.min_stake_amount,
            LockerError::BelowMinimum
        );
        require!(
            native_amount >= self.min_native_amount,
            LockerError::BelowMinimum
        );
        Ok(())
    }

    /// Calculate the VG reward for an amount of locked LP
    ///
    /// Formula: reward = lp_amount * lp_to_reward_ratio / lp_divisor (floor)
    pub fn calculate_reward(&self, lp_amount: u64) -> Result<u64> {
        let reward = (lp_amount as u128)
            .checked_mul(self.lp_to_reward_ratio as u128)
            .ok_or(LockerError::MathOverflow)?
            .checked_div(self.lp_divisor as u128)
            .ok_or(LockerError::DivisionByZero)?;

        u64::try_from(reward).map_err(|_| error!(LockerError::MathOverflow))
    }

    /// Settle an adapter call from the balances around it.
    ///
    /// Measures spent and received amounts, enforces the slippage floors and
    /// `min_lp_out`, closes the custody receipt and prices the reward.
    pub fn settle_provision(
        &self,
        receipt: CustodyReceipt,
        args: &ProvisionArgs,
        before: &BalanceSnapshot,
        after: &BalanceSnapshot,
        min_lp_out: u64,
    ) -> Result<LockSettlement> {
        let outcome = ProvisionOutcome::measure(before, after)?;
        outcome.validate(args, min_lp_out)?;

        let refund = receipt.settle(outcome.token_spent, outcome.native_spent)?;
        let reward = self.calculate_reward(outcome.lp_received)?;

        Ok(LockSettlement {
            outcome,
            refund,
            reward,
        })
    }

    pub fn guard_params(&self) -> GuardParams {
        GuardParams {
            enabled: self.mev_protection_enabled,
            min_time_between_txs: self.min_time_between_txs,
            max_tx_per_block: self.max_tx_per_user_per_block,
        }
    }

    /// Record a successful lock. Both aggregates move together or not at all.
    pub fn record_lock(&mut self, lp_amount: u64, reward: u64) -> Result<()> {
        let total_locked_lp = self
            .total_locked_lp
            .checked_add(lp_amount)
            .ok_or(LockerError::MathOverflow)?;
        let total_reward_issued = self
            .total_reward_issued
            .checked_add(reward)
            .ok_or(LockerError::MathOverflow)?;
        let lock_count = self
            .lock_count
            .checked_add(1)
            .ok_or(LockerError::MathOverflow)?;

        self.total_locked_lp = total_locked_lp;
        self.total_reward_issued = total_reward_issued;
        self.lock_count = lock_count;

        Ok(())
    }

    /// Record VG funded or minted into the vault
    pub fn record_deposit(&mut self, amount: u64) -> Result<()> {
        self.total_reward_deposited = self
            .total_reward_deposited
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        Ok(())
    }

    /// Reject a mint that would push VG supply over the cap
    pub fn check_supply_cap(&self, current_supply: u64, amount: u64) -> Result<()> {
        require!(self.reward_supply_cap > 0, LockerError::SupplyCapExceeded);

        let new_supply = current_supply
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        require!(
            new_supply <= self.reward_supply_cap,
            LockerError::SupplyCapExceeded
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn locker() -> Locker {
        Locker {
            authority: key(1),
            liquidity_adapter: key(2),
            lp_to_reward_ratio: 1_000,
            lp_divisor: 1,
            min_stake_amount: 10,
            min_native_amount: 20,
            max_slippage_bps: 500,
            default_slippage_bps: 100,
            mev_protection_enabled: true,
            min_time_between_txs: 30,
            max_tx_per_user_per_block: 1,
            ..Locker::default()
        }
    }

    fn code(err: anchor_lang::error::Error) -> u32 {
        match err {
            anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn capability_from_other_key_is_rejected() {
        let mut locker = locker();
        let before = locker.clone();
        let intruder = AuthorityCapability::new(key(9));

        let update = ConfigUpdate {
            lp_divisor: Some(2),
            ..ConfigUpdate::default()
        };

        let err = locker.apply_update(&intruder, &update).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::Unauthorized));
        assert_eq!(locker.lp_divisor, before.lp_divisor);
    }

    #[test]
    fn update_applies_all_fields_when_valid() {
        let mut locker = locker();
        let cap = AuthorityCapability::new(locker.authority);
        let adapter = key(3);

        let update = ConfigUpdate {
            lp_to_reward_ratio: Some(3),
            lp_divisor: Some(2),
            max_slippage_bps: Some(1_000),
            default_slippage_bps: Some(50),
            mev_protection_enabled: Some(false),
            liquidity_adapter: Some(adapter),
            ..ConfigUpdate::default()
        };
        locker.apply_update(&cap, &update).unwrap();

        assert_eq!(locker.lp_to_reward_ratio, 3);
        assert_eq!(locker.lp_divisor, 2);
        assert_eq!(locker.max_slippage_bps, 1_000);
        assert_eq!(locker.default_slippage_bps, 50);
        assert!(!locker.mev_protection_enabled);
        assert_eq!(locker.liquidity_adapter, adapter);
    }

    #[test]
    fn zero_divisor_update_is_rejected_and_nothing_changes() {
        let mut locker = locker();
        let cap = AuthorityCapability::new(locker.authority);

        let update = ConfigUpdate {
            lp_to_reward_ratio: Some(7),
            lp_divisor: Some(0),
            ..ConfigUpdate::default()
        };

        let err = locker.apply_update(&cap, &update).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InvalidConfig));
        assert_eq!(locker.lp_to_reward_ratio, 1_000);
        assert_eq!(locker.lp_divisor, 1);
    }

    #[test]
    fn default_slippage_cannot_exceed_max() {
        let mut locker = locker();
        let cap = AuthorityCapability::new(locker.authority);

        let update = ConfigUpdate {
            max_slippage_bps: Some(50),
            ..ConfigUpdate::default()
        };

        let err = locker.apply_update(&cap, &update).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InvalidConfig));
    }

    #[test]
    fn empty_update_is_rejected() {
        let mut locker = locker();
        let cap = AuthorityCapability::new(locker.authority);

        let err = locker
            .apply_update(&cap, &ConfigUpdate::default())
            .unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InvalidConfig));
    }

    #[test]
    fn slippage_resolution() {
        let locker = locker();

        assert_eq!(locker.resolve_slippage(None).unwrap(), 100);
        assert_eq!(locker.resolve_slippage(Some(500)).unwrap(), 500);

        let err = locker.resolve_slippage(Some(0)).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InvalidSlippage));

        let err = locker.resolve_slippage(Some(501)).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InvalidSlippage));
    }

    #[test]
    fn min_after_slippage_rounds_down() {
        assert_eq!(min_after_slippage(10_000, 100).unwrap(), 9_900);
        assert_eq!(min_after_slippage(999, 100).unwrap(), 989);
        assert_eq!(min_after_slippage(u64::MAX, 0).unwrap(), u64::MAX);
        assert_eq!(min_after_slippage(1_000, 10_000).unwrap(), 0);
    }

    #[test]
    fn record_lock_overflow_leaves_aggregates_untouched() {
        let mut locker = locker();
        locker.total_locked_lp = 10;
        locker.total_reward_issued = u64::MAX;

        let err = locker.record_lock(5, 1).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::MathOverflow));
        assert_eq!(locker.total_locked_lp, 10);
        assert_eq!(locker.lock_count, 0);
    }

    #[test]
    fn paused_or_in_flight_locker_is_closed() {
        let mut locker = locker();
        locker.check_open().unwrap();

        locker.is_paused = true;
        let err = locker.check_open().unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::LockerPaused));

        locker.is_paused = false;
        locker.in_flight = true;
        let err = locker.check_open().unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::ReentrantCall));
    }

    #[test]
    fn settlement_refunds_and_prices_the_measured_lp() {
        let locker = locker();
        let args = ProvisionArgs::new(10_000, 20_000, 100, 0).unwrap();
        let before = BalanceSnapshot {
            stake_custody: 10_000,
            native_custody: 20_000,
            lp_lock_vault: 7,
            reward_vault: 1_000_000,
        };
        let after = BalanceSnapshot {
            stake_custody: 50,
            native_custody: 100,
            lp_lock_vault: 10,
            reward_vault: 1_000_000,
        };

        let settlement = locker
            .settle_provision(CustodyReceipt::new(10_000, 20_000), &args, &before, &after, 3)
            .unwrap();

        assert_eq!(settlement.outcome.lp_received, 3);
        assert_eq!(settlement.refund, Refund { stake: 50, native: 100 });
        assert_eq!(settlement.reward, 3_000);
    }

    #[test]
    fn supply_cap() {
        let mut locker = locker();

        let err = locker.check_supply_cap(0, 1).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::SupplyCapExceeded));

        locker.reward_supply_cap = 1_000;
        locker.check_supply_cap(400, 600).unwrap();

        let err = locker.check_supply_cap(400, 601).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::SupplyCapExceeded));
    }
}
