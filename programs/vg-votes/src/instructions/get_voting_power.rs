use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::constants::{VOTER_SEED, VOTING_WRAPPER_SEED};
use crate::error::VotesError;
use crate::state::{VoterRecord, VotingPowerView, VotingWrapper};

/// Read-only view of a holder's voting power; freshness is computed live
#[derive(Accounts)]
pub struct GetVotingPower<'info> {
    #[account(
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    #[account(
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

pub fn handler_get_voting_power(ctx: Context<GetVotingPower>) -> Result<VotingPowerView> {
    ctx.accounts.voter_record.view(
        ctx.accounts.holder_vg_account.amount,
        ctx.accounts.voting_wrapper.rate_version,
    )
}
