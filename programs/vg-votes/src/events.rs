use anchor_lang::prelude::*;

use crate::state::VotingStatus;

#[event]
pub struct WrapperInitialized {
    pub wrapper: Pubkey,
    pub authority: Pubkey,
    pub vg_mint: Pubkey,
    pub exchange_rate: u64,
}

#[event]
pub struct VotingEnabled {
    pub wrapper: Pubkey,
    pub holder: Pubkey,
    pub voting_power: u64,
    pub vg_balance: u64,
}

#[event]
pub struct VotingRefreshed {
    pub wrapper: Pubkey,
    pub holder: Pubkey,
    pub previous_power: u64,
    pub voting_power: u64,
    pub status: VotingStatus,
}

#[event]
pub struct VotingDisabled {
    pub wrapper: Pubkey,
    pub holder: Pubkey,
    pub released_power: u64,
}

#[event]
pub struct VotesDelegated {
    pub wrapper: Pubkey,
    pub holder: Pubkey,
    pub delegatee: Pubkey,
    pub power: u64,
}

#[event]
pub struct VotesUndelegated {
    pub wrapper: Pubkey,
    pub holder: Pubkey,
    pub delegatee: Pubkey,
    pub power: u64,
}

#[event]
pub struct ExchangeRateUpdated {
    pub wrapper: Pubkey,
    pub old_rate: u64,
    pub new_rate: u64,
    pub rate_version: u32,
}

#[event]
pub struct AuthorityTransferred {
    pub wrapper: Pubkey,
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
}
