// =============================================================================
// Get Config Instruction
// =============================================================================
// Read-only view of the locker's configuration and aggregates, delivered as
// instruction return data.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::{Locker, LockerConfigView};

#[derive(Accounts)]
pub struct GetConfig<'info> {
    #[account(
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump
    )]
    pub locker: Account<'info, Locker>,
}

/// Handler for the get_config instruction
pub fn handler_get_config(ctx: Context<GetConfig>) -> Result<LockerConfigView> {
    Ok(LockerConfigView::from(&*ctx.accounts.locker))
}
