//! Events emitted by the VG Locker program.
//! Indexers and dashboards consume these; every successful lock emits exactly one `LpLocked`.

use anchor_lang::prelude::*;

#[event]
pub struct LockerInitialized {
    pub locker: Pubkey,
    pub authority: Pubkey,
    pub lp_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub liquidity_adapter: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct LpLocked {
    pub locker: Pubkey,
    pub caller: Pubkey,
    pub lp_amount: u64,
    pub reward_amount: u64,
    pub stake_spent: u64,
    pub native_spent: u64,
    pub slot: u64,
    pub timestamp: i64,
    pub total_locked_lp: u64,
    pub total_reward_issued: u64,
}

#[event]
pub struct VaultFunded {
    pub locker: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    /// True when the VG was minted by the locker rather than transferred in
    pub minted: bool,
    pub total_reward_deposited: u64,
    pub timestamp: i64,
}

#[event]
pub struct ConfigUpdated {
    pub locker: Pubkey,
    pub authority: Pubkey,
    pub lp_to_reward_ratio: u64,
    pub lp_divisor: u64,
    pub max_slippage_bps: u16,
    pub default_slippage_bps: u16,
    pub mev_protection_enabled: bool,
    pub timestamp: i64,
}

#[event]
pub struct VaultUpdated {
    pub locker: Pubkey,
    pub old_vault: Pubkey,
    pub new_vault: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AuthorityTransferred {
    pub locker: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct LockerPauseChanged {
    pub locker: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}
