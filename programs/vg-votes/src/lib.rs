use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;
use state::VotingPowerView;

declare_id!("6nkJTA2seURrxHCT4joVf4FqB2UA1ocNCXecDiMWtZzy");

#[program]
pub mod vg_votes {
    use super::*;

    /// Initialize the voting wrapper for the VG mint
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    /// * `exchange_rate` - Voting power per VG, scaled by RATE_PRECISION (1e9 = 1:1)
    ///
    pub fn initialize_wrapper(ctx: Context<InitializeWrapper>, exchange_rate: u64) -> Result<()> {
        instructions::initialize_wrapper::handler_initialize_wrapper(ctx, exchange_rate)
    }

    /// Turn the holder's VG balance into voting power
    ///
    /// Idempotent: calling again re-snapshots the balance.
    /// VG is not transferred or locked.
    ///
    pub fn enable_voting(ctx: Context<EnableVoting>) -> Result<()> {
        instructions::voting::handler_enable_voting(ctx)
    }

    /// Re-snapshot a holder's voting power (anyone)
    ///
    /// # Accounts
    /// * `delegatee_record` - Required while the holder is delegated
    ///
    pub fn refresh_voting(ctx: Context<RefreshVoting>) -> Result<()> {
        instructions::voting::handler_refresh_voting(ctx)
    }

    /// Flag a holder's snapshot Stale or Fresh (anyone)
    pub fn sync_freshness(ctx: Context<SyncFreshness>) -> Result<()> {
        instructions::voting::handler_sync_freshness(ctx)
    }

    /// Give up voting power (must not be delegated)
    pub fn disable_voting(ctx: Context<DisableVoting>) -> Result<()> {
        instructions::voting::handler_disable_voting(ctx)
    }

    /// Delegate voting power to another holder
    pub fn delegate(ctx: Context<Delegate>) -> Result<()> {
        instructions::delegation::handler_delegate(ctx)
    }

    /// Take delegated voting power back
    ///
    /// # Accounts
    /// * `delegatee_record` - The current delegatee's record; a holder that is
    ///   not delegated gets `NotDelegated` whether or not it is passed
    ///
    pub fn undelegate(ctx: Context<Undelegate>) -> Result<()> {
        instructions::delegation::handler_undelegate(ctx)
    }

    /// Change the VG -> voting power exchange rate (authority only)
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    /// * `new_rate` - New rate, scaled by RATE_PRECISION
    ///
    pub fn update_exchange_rate(ctx: Context<UpdateExchangeRate>, new_rate: u64) -> Result<()> {
        instructions::admin::update_exchange_rate(ctx, new_rate)
    }

    /// Transfer authority to a new address (authority only)
    pub fn transfer_authority(ctx: Context<TransferAuthority>) -> Result<()> {
        instructions::admin::transfer_authority(ctx)
    }

    /// Return a holder's own, received and effective voting power
    pub fn get_voting_power(ctx: Context<GetVotingPower>) -> Result<VotingPowerView> {
        instructions::get_voting_power::handler_get_voting_power(ctx)
    }
}
