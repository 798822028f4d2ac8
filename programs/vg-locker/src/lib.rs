// =============================================================================
// VG Locker - Permanent LP Lock & Reward Program
// =============================================================================
//
// Users provide a stake token plus native SOL. The locker:
// - pairs them into LP through a configured liquidity adapter program
// - locks the LP forever in a locker-owned vault (no unlock instruction)
// - pays VG from a pre-funded reward vault: reward = lp * ratio / divisor
//
// A per-user guard limits lock frequency (MEV / abuse protection).
// =============================================================================

pub mod adapter;
pub mod constants;
pub mod custody;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod vault;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use instructions::*;
pub use state::*;

declare_id!("2W2vtxzBZmSCMZmibxoon9baLySRGTJGP2TgKsxhFTvB");

#[program]
pub mod vg_locker {
    use super::*;

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize a locker for one LP mint
    ///
    /// Creates:
    /// - Locker account (configuration + aggregates)
    /// - Stake and native custody token accounts
    /// - LP lock vault (LP never leaves it)
    /// - Reward vault (VG paid to lockers)
    ///
    /// Can only be called once per LP mint
    pub fn initialize_locker(
        ctx: Context<InitializeLocker>,
        params: InitializeLockerParams,
    ) -> Result<()> {
        instructions::initialize_locker::handler_initialize_locker(ctx, params)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Provide liquidity, lock the LP permanently and receive VG
    ///
    /// # Arguments
    /// * `stake_amount` - Stake token to provide (base units)
    /// * `native_amount` - Lamports to provide
    /// * `slippage_bps` - Accepted slippage, `None` for the locker default
    /// * `min_lp_out` - Minimum LP to lock (slippage protection, 0 to skip)
    ///
    /// Pool accounts required by the liquidity adapter go in remaining_accounts.
    pub fn lock_and_earn<'info>(
        ctx: Context<'_, '_, 'info, 'info, LockAndEarn<'info>>,
        stake_amount: u64,
        native_amount: u64,
        slippage_bps: Option<u16>,
        min_lp_out: u64,
    ) -> Result<()> {
        instructions::lock_and_earn::handler_lock_and_earn(
            ctx,
            stake_amount,
            native_amount,
            slippage_bps,
            min_lp_out,
        )
    }

    // =========================================================================
    // Reward Vault
    // =========================================================================

    /// Transfer VG into the reward vault (anyone)
    pub fn fund_vault(ctx: Context<FundVault>, amount: u64) -> Result<()> {
        instructions::fund_vault::handler_fund_vault(ctx, amount)
    }

    /// Mint VG into the reward vault (authority only)
    ///
    /// Requires the locker PDA to be the VG mint authority. The resulting
    /// supply may not exceed `reward_supply_cap`; a cap of 0 disables minting.
    pub fn mint_to_vault(ctx: Context<MintToVault>, amount: u64) -> Result<()> {
        instructions::fund_vault::handler_mint_to_vault(ctx, amount)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Change configuration parameters (authority only)
    ///
    /// Fields left `None` are unchanged. The resulting configuration must
    /// satisfy every parameter invariant or nothing is applied.
    pub fn update_config(ctx: Context<UpdateConfig>, update: ConfigUpdate) -> Result<()> {
        instructions::admin::handler_update_config(ctx, update)
    }

    /// Point the locker at a different reward vault (authority only)
    pub fn update_vault(ctx: Context<UpdateVault>) -> Result<()> {
        instructions::admin::handler_update_vault(ctx)
    }

    /// Hand the authority to a new address (authority only)
    pub fn transfer_authority(ctx: Context<TransferAuthority>) -> Result<()> {
        instructions::admin::handler_transfer_authority(ctx)
    }

    /// Pause or unpause lock_and_earn (authority only)
    pub fn set_paused(ctx: Context<SetPaused>, paused: bool) -> Result<()> {
        instructions::admin::handler_set_paused(ctx, paused)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Return the full configuration record
    pub fn get_config(ctx: Context<GetConfig>) -> Result<LockerConfigView> {
        instructions::get_config::handler_get_config(ctx)
    }
}
