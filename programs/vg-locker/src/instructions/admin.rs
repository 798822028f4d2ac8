// =============================================================================
// Admin Instructions
// =============================================================================
// Administrative functions that only the locker authority can call.
//
// Every handler builds an AuthorityCapability from the signer and lets the
// Locker check it; there is no other way to change configuration.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::*;
use crate::error::LockerError;
use crate::events::{AuthorityTransferred, ConfigUpdated, LockerPauseChanged, VaultUpdated};
use crate::state::{AuthorityCapability, ConfigUpdate, Locker};
use crate::vault::VaultReserve;

// =============================================================================
// Update Config
// =============================================================================

/// Accounts required for the update_config instruction
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump,
        constraint = !locker.in_flight @ LockerError::ReentrantCall
    )]
    pub locker: Account<'info, Locker>,
}

/// Handler for the update_config instruction
pub fn handler_update_config(ctx: Context<UpdateConfig>, update: ConfigUpdate) -> Result<()> {
    let capability = AuthorityCapability::from_signer(&ctx.accounts.authority);
    let locker = &mut ctx.accounts.locker;

    locker.apply_update(&capability, &update)?;

    msg!("Config UPDATED by {}", capability.holder());
    msg!(
        "Reward ratio: {}/{}, slippage default/max: {}/{} bps",
        locker.lp_to_reward_ratio,
        locker.lp_divisor,
        locker.default_slippage_bps,
        locker.max_slippage_bps
    );

    emit!(ConfigUpdated {
        locker: locker.key(),
        authority: capability.holder(),
        lp_to_reward_ratio: locker.lp_to_reward_ratio,
        lp_divisor: locker.lp_divisor,
        max_slippage_bps: locker.max_slippage_bps,
        default_slippage_bps: locker.default_slippage_bps,
        mev_protection_enabled: locker.mev_protection_enabled,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Update Vault
// =============================================================================

/// Accounts required for the update_vault instruction
#[derive(Accounts)]
pub struct UpdateVault<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump,
        constraint = !locker.in_flight @ LockerError::ReentrantCall
    )]
    pub locker: Account<'info, Locker>,

    /// Replacement vault. Either owned by the locker or delegating to it.
    #[account(
        token::mint = locker.reward_mint
    )]
    pub new_vault: Account<'info, TokenAccount>,
}

/// Handler for the update_vault instruction
pub fn handler_update_vault(ctx: Context<UpdateVault>) -> Result<()> {
    let capability = AuthorityCapability::from_signer(&ctx.accounts.authority);
    ctx.accounts.locker.authorize(&capability)?;

    let locker_key = ctx.accounts.locker.key();
    let new_vault = ctx.accounts.new_vault.key();

    // The locker must own the new vault or be its approved delegate
    let reserve =
        VaultReserve::of(&ctx.accounts.new_vault, &locker_key).ok_or(LockerError::Unauthorized)?;

    let locker = &mut ctx.accounts.locker;
    require!(new_vault != locker.reward_vault, LockerError::InvalidVault);

    let old_vault = locker.reward_vault;
    locker.reward_vault = new_vault;

    msg!("Reward vault UPDATED");
    msg!("Old vault: {}", old_vault);
    msg!("New vault: {} (available {})", new_vault, reserve.available());

    emit!(VaultUpdated {
        locker: locker_key,
        old_vault,
        new_vault,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Transfer Authority
// =============================================================================

/// Accounts required for the transfer_authority instruction
#[derive(Accounts)]
pub struct TransferAuthority<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump
    )]
    pub locker: Account<'info, Locker>,

    /// The new authority
    /// CHECK: This is just the new authority address, we just store it
    pub new_authority: UncheckedAccount<'info>,
}

/// Handler for the transfer_authority instruction
pub fn handler_transfer_authority(ctx: Context<TransferAuthority>) -> Result<()> {
    let capability = AuthorityCapability::from_signer(&ctx.accounts.authority);
    let new_authority = ctx.accounts.new_authority.key();
    let locker = &mut ctx.accounts.locker;

    locker.authorize(&capability)?;

    require!(
        new_authority != Pubkey::default(),
        LockerError::InvalidAuthority
    );
    require!(
        new_authority != locker.authority,
        LockerError::InvalidAuthority
    );

    let old_authority = locker.authority;
    locker.authority = new_authority;

    msg!("Authority TRANSFERRED!");
    msg!("Old authority: {}", old_authority);
    msg!("New authority: {}", new_authority);

    emit!(AuthorityTransferred {
        locker: locker.key(),
        old_authority,
        new_authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Pause
// =============================================================================

/// Accounts required for the set_paused instruction
#[derive(Accounts)]
pub struct SetPaused<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump
    )]
    pub locker: Account<'info, Locker>,
}

/// Handler for the set_paused instruction
pub fn handler_set_paused(ctx: Context<SetPaused>, paused: bool) -> Result<()> {
    let capability = AuthorityCapability::from_signer(&ctx.accounts.authority);
    let locker = &mut ctx.accounts.locker;

    locker.authorize(&capability)?;

    if locker.is_paused == paused {
        msg!(
            "Locker is already {}",
            if paused { "paused" } else { "unpaused" }
        );
        return Ok(());
    }

    locker.is_paused = paused;

    msg!(
        "Locker {} by authority {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        capability.holder()
    );

    emit!(LockerPauseChanged {
        locker: locker.key(),
        paused,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
