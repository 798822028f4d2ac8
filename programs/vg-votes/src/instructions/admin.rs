use anchor_lang::prelude::*;

use crate::constants::VOTING_WRAPPER_SEED;
use crate::error::VotesError;
use crate::events::{AuthorityTransferred, ExchangeRateUpdated};
use crate::state::VotingWrapper;

// =============================================================================
// Update Exchange Rate
// =============================================================================

#[derive(Accounts)]
pub struct UpdateExchangeRate<'info> {
    #[account(
        constraint = authority.key() == voting_wrapper.authority @ VotesError::Unauthorized
    )]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,
}

/// Every existing snapshot becomes stale until refreshed
pub fn update_exchange_rate(ctx: Context<UpdateExchangeRate>, new_rate: u64) -> Result<()> {
    let wrapper = &mut ctx.accounts.voting_wrapper;
    let old_rate = wrapper.exchange_rate;

    wrapper.set_exchange_rate(new_rate)?;

    msg!(
        "Exchange rate updated from {} to {} (version {})",
        old_rate,
        new_rate,
        wrapper.rate_version
    );

    emit!(ExchangeRateUpdated {
        wrapper: wrapper.key(),
        old_rate,
        new_rate,
        rate_version: wrapper.rate_version,
    });

    Ok(())
}

// =============================================================================
// Transfer Authority
// =============================================================================

#[derive(Accounts)]
pub struct TransferAuthority<'info> {
    #[account(
        constraint = authority.key() == voting_wrapper.authority @ VotesError::Unauthorized
    )]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    /// CHECK: New authority address, validated to not be default
    #[account(
        constraint = new_authority.key() != Pubkey::default() @ VotesError::InvalidAuthority,
        constraint = new_authority.key() != authority.key() @ VotesError::InvalidAuthority
    )]
    pub new_authority: UncheckedAccount<'info>,
}

pub fn transfer_authority(ctx: Context<TransferAuthority>) -> Result<()> {
    let old_authority = ctx.accounts.voting_wrapper.authority;
    ctx.accounts.voting_wrapper.authority = ctx.accounts.new_authority.key();

    msg!(
        "Authority transferred from {} to {}",
        old_authority,
        ctx.accounts.new_authority.key()
    );

    emit!(AuthorityTransferred {
        wrapper: ctx.accounts.voting_wrapper.key(),
        old_authority,
        new_authority: ctx.accounts.new_authority.key(),
    });

    Ok(())
}
