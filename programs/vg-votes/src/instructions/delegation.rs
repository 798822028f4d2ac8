use anchor_lang::prelude::*;

use crate::constants::{VOTER_SEED, VOTING_WRAPPER_SEED};
use crate::error::VotesError;
use crate::events::{VotesDelegated, VotesUndelegated};
use crate::state::{VoterRecord, VotingStatus, VotingWrapper};

// =============================================================================
// Delegate
// =============================================================================

/// Hand the holder's voting power to another holder
///
/// # Rules
/// * Holder must be Active
/// * No self-delegation
/// * No chains: the delegatee may not be delegating, and a holder with
///   received power may not delegate
#[derive(Accounts)]
pub struct Delegate<'info> {
    #[account(mut)]
    pub holder: Signer<'info>,

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

    /// CHECK: Delegatee address, only used to derive its record
    #[account(
        constraint = delegatee.key() != holder.key() @ VotesError::SelfDelegation,
        constraint = delegatee.key() != Pubkey::default() @ VotesError::InvalidDelegatee
    )]
    pub delegatee: UncheckedAccount<'info>,

    /// Delegatee's voting record (created if the delegatee never registered)
    #[account(
        init_if_needed,
        payer = holder,
        space = VoterRecord::SIZE,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), delegatee.key().as_ref()],
        bump
    )]
    pub delegatee_record: Account<'info, VoterRecord>,

    pub system_program: Program<'info, System>,
}

pub fn handler_delegate(ctx: Context<Delegate>) -> Result<()> {
    let delegatee_record = &mut ctx.accounts.delegatee_record;
    if delegatee_record.holder == Pubkey::default() {
        delegatee_record.wrapper = ctx.accounts.voting_wrapper.key();
        delegatee_record.holder = ctx.accounts.delegatee.key();
        delegatee_record.bump = ctx.bumps.delegatee_record;
    }

    let record = &mut ctx.accounts.voter_record;
    let power = record.delegate(delegatee_record)?;

    msg!(
        "{} delegated {} votes to {}. Delegatee received total: {}",
        record.holder,
        power,
        delegatee_record.holder,
        delegatee_record.received_power
    );

    emit!(VotesDelegated {
        wrapper: ctx.accounts.voting_wrapper.key(),
        holder: record.holder,
        delegatee: delegatee_record.holder,
        power,
    });

    Ok(())
}

// =============================================================================
// Undelegate
// =============================================================================

#[derive(Accounts)]
pub struct Undelegate<'info> {
    pub holder: Signer<'info>,

    #[account(
        seeds = [VOTING_WRAPPER_SEED, voting_wrapper.vg_mint.as_ref()],
        bump = voting_wrapper.bump
    )]
    pub voting_wrapper: Account<'info, VotingWrapper>,

    #[account(
        mut,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), holder.key().as_ref()],
        bump = voter_record.bump,
        constraint = voter_record.status == VotingStatus::Delegated @ VotesError::NotDelegated
    )]
    pub voter_record: Account<'info, VoterRecord>,

    /// Record of the current delegatee. Omitted by a holder with no delegation.
    #[account(
        mut,
        seeds = [VOTER_SEED, voting_wrapper.key().as_ref(), voter_record.delegatee.as_ref()],
        bump = delegatee_record.bump
    )]
    pub delegatee_record: Option<Account<'info, VoterRecord>>,
}

pub fn handler_undelegate(ctx: Context<Undelegate>) -> Result<()> {
    let record = &mut ctx.accounts.voter_record;
    let delegatee_record = ctx
        .accounts
        .delegatee_record
        .as_mut()
        .map(|account| &mut **account)
        .ok_or(VotesError::InvalidDelegatee)?;

    let delegatee = record.delegatee;
    let power = record.undelegate(delegatee_record)?;

    msg!(
        "{} took back {} votes from {}",
        record.holder,
        power,
        delegatee
    );

    emit!(VotesUndelegated {
        wrapper: ctx.accounts.voting_wrapper.key(),
        holder: record.holder,
        delegatee,
        power,
    });

    Ok(())
}
