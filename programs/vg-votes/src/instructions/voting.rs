use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::constants::{VOTER_SEED, VOTING_WRAPPER_SEED};
use crate::error::VotesError;
use crate::events::{VotingDisabled, VotingEnabled, VotingRefreshed};
use crate::state::{VoterRecord, VotingWrapper};

// =============================================================================
// Enable Voting
// =============================================================================

/// Register the holder's VG balance as voting power
///
/// # Flow
/// 1. Snapshot the holder's VG balance at the current rate
/// 2. Mark the record Active (idempotent)
/// 3. Update wrapper totals
///
/// No VG moves; the balance stays in the holder's wallet.
#[derive(Accounts)]
pub struct EnableVoting<'info> {
    #[account(mut)]
    pub holder: Signer<'info>,

    #[account(
        mut,
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    /// Holder's voting record (created on first use)
    #[account(
        init_if_needed,
        payer = holder,
        space = VoterRecord::SIZE,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), holder.key().as_ref()],
        bump
    )]
    pub voter_record: Account<'info, VoterRecord>,

    #[account(address = voting_wrapper.vg_mint @ VotesError::InvalidVgMint)]
    pub vg_mint: Account<'info, Mint>,

    /// Holder's VG account
    #[account(
        associated_token::mint = vg_mint,
        associated_token::authority = holder
    )]
    pub holder_vg_account: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
}

pub fn handler_enable_voting(ctx: Context<EnableVoting>) -> Result<()> {
    let wrapper = &mut ctx.accounts.voting_wrapper;
    let record = &mut ctx.accounts.voter_record;

    if record.holder == Pubkey::default() {
        record.wrapper = wrapper.key();
        record.holder = ctx.accounts.holder.key();
        record.bump = ctx.bumps.voter_record;
    }

    let balance = ctx.accounts.holder_vg_account.amount;
    let snapshot = wrapper.snapshot(balance, Clock::get()?.slot)?;

    let was_registered = record.is_registered();
    let previous = record.enable(&snapshot)?;

    if !was_registered {
        wrapper.register_voter()?;
    }
    wrapper.apply_power_change(previous, snapshot.power)?;

    msg!(
        "Voting enabled for {}: {} VG -> {} votes. Wrapper total: {}",
        record.holder,
        balance,
        snapshot.power,
        wrapper.total_voting_power
    );

    emit!(VotingEnabled {
        wrapper: wrapper.key(),
        holder: record.holder,
        voting_power: snapshot.power,
        vg_balance: balance,
    });

    Ok(())
}

// =============================================================================
// Refresh Voting
// =============================================================================

/// Re-snapshot a registered holder. Anyone may call this.
///
/// While the holder is Delegated, the delegatee's record must be passed so
/// its received power follows the new snapshot.
#[derive(Accounts)]
pub struct RefreshVoting<'info> {
    #[account(
        mut,
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    #[account(
        mut,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), holder.key().as_ref()],
        bump = voter_record.bump
    )]
    pub voter_record: Account<'info, VoterRecord>,

    /// CHECK: Only used to derive the record and the VG account
    pub holder: UncheckedAccount<'info>,

    #[account(address = voting_wrapper.vg_mint @ VotesError::InvalidVgMint)]
    pub vg_mint: Account<'info, Mint>,

    #[account(
        associated_token::mint = vg_mint,
        associated_token::authority = holder
    )]
    pub holder_vg_account: Account<'info, TokenAccount>,

    /// Record of the current delegatee, required while Delegated
    #[account(mut)]
    pub delegatee_record: Option<Account<'info, VoterRecord>>,
}

pub fn handler_refresh_voting(ctx: Context<RefreshVoting>) -> Result<()> {
    let wrapper = &mut ctx.accounts.voting_wrapper;
    let record = &mut ctx.accounts.voter_record;

    let balance = ctx.accounts.holder_vg_account.amount;
    let snapshot = wrapper.snapshot(balance, Clock::get()?.slot)?;

    let delegatee = ctx
        .accounts
        .delegatee_record
        .as_mut()
        .map(|account| &mut **account);
    let previous = record.refresh(&snapshot, delegatee)?;

    wrapper.apply_power_change(previous, snapshot.power)?;

    msg!(
        "Voting refreshed for {}: {} -> {} votes",
        record.holder,
        previous,
        snapshot.power
    );

    emit!(VotingRefreshed {
        wrapper: wrapper.key(),
        holder: record.holder,
        previous_power: previous,
        voting_power: snapshot.power,
        status: record.status,
    });

    Ok(())
}

// =============================================================================
// Sync Freshness
// =============================================================================

/// Mark a record Stale or Fresh against the live balance and rate. Anyone may call this.
#[derive(Accounts)]
pub struct SyncFreshness<'info> {
    #[account(
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    #[account(
        mut,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), holder.key().as_ref()],
        bump = voter_record.bump
    )]
    pub voter_record: Account<'info, VoterRecord>,

    /// CHECK: Only used to derive the record and the VG account
    pub holder: UncheckedAccount<'info>,

    #[account(address = voting_wrapper.vg_mint @ VotesError::InvalidVgMint)]
    pub vg_mint: Account<'info, Mint>,

    #[account(
        associated_token::mint = vg_mint,
        associated_token::authority = holder
    )]
    pub holder_vg_account: Account<'info, TokenAccount>,
}

pub fn handler_sync_freshness(ctx: Context<SyncFreshness>) -> Result<()> {
    let freshness = ctx.accounts.voter_record.sync_freshness(
        ctx.accounts.holder_vg_account.amount,
        ctx.accounts.voting_wrapper.rate_version,
    );

    msg!(
        "Voter {} is {:?}",
        ctx.accounts.voter_record.holder,
        freshness
    );

    Ok(())
}

// =============================================================================
// Disable Voting
// =============================================================================

#[derive(Accounts)]
pub struct DisableVoting<'info> {
    pub holder: Signer<'info>,

    #[account(
        mut,
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    #[account(
        mut,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), holder.key().as_ref()],
        bump = voter_record.bump
    )]
    pub voter_record: Account<'info, VoterRecord>,
}

pub fn handler_disable_voting(ctx: Context<DisableVoting>) -> Result<()> {
    let wrapper = &mut ctx.accounts.voting_wrapper;
    let record = &mut ctx.accounts.voter_record;

    let released = record.disable()?;
    wrapper.apply_power_change(released, 0)?;
    wrapper.unregister_voter()?;

    msg!(
        "Voting disabled for {}. Released {} votes",
        record.holder,
        released
    );

    emit!(VotingDisabled {
        wrapper: wrapper.key(),
        holder: record.holder,
        released_power: released,
    });

    Ok(())
}
