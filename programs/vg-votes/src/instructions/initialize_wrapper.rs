use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::VOTING_WRAPPER_SEED;
use crate::events::WrapperInitialized;
use crate::state::VotingWrapper;

/// Initialize the voting wrapper for a VG mint
///
/// # Arguments
/// * `ctx` - The context containing all accounts
/// * `exchange_rate` - Voting power per VG, scaled by RATE_PRECISION
///
/// # Accounts
/// * `authority` - Authority over the exchange rate (signer, payer)
/// * `voting_wrapper` - Wrapper PDA to create
/// * `vg_mint` - The VG token mint
///
#[derive(Accounts)]
pub struct InitializeWrapper<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = VotingWrapper::SIZE,
        seeds = [VOTING_WRAPPER_SEED, vg_mint.key().as_ref()],
        bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    pub vg_mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
}

pub fn handler_initialize_wrapper(ctx: Context<InitializeWrapper>, exchange_rate: u64) -> Result<()> {
    VotingWrapper::validate_rate(exchange_rate)?;

    let wrapper = &mut ctx.accounts.voting_wrapper;

    wrapper.authority = ctx.accounts.authority.key();
    wrapper.vg_mint = ctx.accounts.vg_mint.key();
    wrapper.exchange_rate = exchange_rate;
    wrapper.rate_version = 0;
    wrapper.total_voting_power = 0;
    wrapper.registered_voters = 0;
    wrapper.bump = ctx.bumps.voting_wrapper;

    msg!(
        "Voting wrapper initialized for VG mint {} at rate {}",
        wrapper.vg_mint,
        wrapper.exchange_rate
    );

    emit!(WrapperInitialized {
        wrapper: wrapper.key(),
        authority: wrapper.authority,
        vg_mint: wrapper.vg_mint,
        exchange_rate,
    });

    Ok(())
}
