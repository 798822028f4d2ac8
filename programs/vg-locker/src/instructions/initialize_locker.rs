// =============================================================================
// Initialize Locker Instruction
// =============================================================================
// Creates the Locker for one LP mint together with its PDA token accounts:
// - stake custody      (stake token held during provisioning)
// - native custody     (wrapped SOL held during provisioning)
// - LP lock vault      (permanent home of every locked LP token)
// - reward vault       (VG reserve rewards are paid from)
//
// Custody belongs to the custody authority PDA; the LP lock vault and the
// reward vault belong to the locker PDA.
//
// Can only be called once per LP mint.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{spl_token, Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::LockerError;
use crate::events::LockerInitialized;
use crate::state::Locker;

/// Initial configuration of a locker
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeLockerParams {
    pub lp_to_reward_ratio: u64,
    pub lp_divisor: u64,
    pub min_stake_amount: u64,
    pub min_native_amount: u64,
    pub max_slippage_bps: u16,
    pub default_slippage_bps: u16,
    pub mev_protection_enabled: bool,
    pub min_time_between_txs: i64,
    pub max_tx_per_user_per_block: u16,
    pub reward_supply_cap: u64,
}

impl Default for InitializeLockerParams {
    fn default() -> Self {
        Self {
            lp_to_reward_ratio: DEFAULT_LP_TO_REWARD_RATIO,
            lp_divisor: DEFAULT_LP_DIVISOR,
            min_stake_amount: DEFAULT_MIN_STAKE_AMOUNT,
            min_native_amount: DEFAULT_MIN_NATIVE_AMOUNT,
            max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            mev_protection_enabled: true,
            min_time_between_txs: DEFAULT_MIN_TIME_BETWEEN_TXS,
            max_tx_per_user_per_block: DEFAULT_MAX_TX_PER_USER_PER_BLOCK,
            reward_supply_cap: 0,
        }
    }
}

/// Accounts required for the initialize_locker instruction
#[derive(Accounts)]
pub struct InitializeLocker<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The authority who will control this locker (pays for account creation)
    #[account(mut)]
    pub authority: Signer<'info>,

    // =========================================================================
    // Locker
    // =========================================================================

    #[account(
        init,
        payer = authority,
        space = 8 + Locker::INIT_SPACE,
        seeds = [LOCKER_SEED, lp_mint.key().as_ref()],
        bump
    )]
    pub locker: Box<Account<'info, Locker>>,

    // =========================================================================
    // Token Mints
    // =========================================================================

    pub stake_mint: Box<Account<'info, Mint>>,

    pub reward_mint: Box<Account<'info, Mint>>,

    pub lp_mint: Box<Account<'info, Mint>>,

    /// Wrapped SOL mint, the native side of the pool
    #[account(address = spl_token::native_mint::ID @ LockerError::InvalidConfig)]
    pub native_mint: Box<Account<'info, Mint>>,

    // =========================================================================
    // Custody
    // =========================================================================

    /// CHECK: Data-less PDA signer over the custody accounts
    #[account(
        seeds = [CUSTODY_AUTHORITY_SEED, locker.key().as_ref()],
        bump
    )]
    pub custody_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        seeds = [STAKE_CUSTODY_SEED, locker.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = custody_authority
    )]
    pub stake_custody: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        seeds = [NATIVE_CUSTODY_SEED, locker.key().as_ref()],
        bump,
        token::mint = native_mint,
        token::authority = custody_authority
    )]
    pub native_custody: Box<Account<'info, TokenAccount>>,

    // =========================================================================
    // Locker-owned Token Accounts
    // =========================================================================

    #[account(
        init,
        payer = authority,
        seeds = [LP_LOCK_SEED, locker.key().as_ref()],
        bump,
        token::mint = lp_mint,
        token::authority = locker
    )]
    pub lp_lock_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        seeds = [REWARD_VAULT_SEED, locker.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = locker
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    // =========================================================================
    // External Programs
    // =========================================================================

    /// Liquidity adapter program
    /// CHECK: Only its key is stored; it must be an executable program
    #[account(constraint = liquidity_adapter.executable @ LockerError::InvalidAdapter)]
    pub liquidity_adapter: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for the initialize_locker instruction
pub fn handler_initialize_locker(
    ctx: Context<InitializeLocker>,
    params: InitializeLockerParams,
) -> Result<()> {
    let locker = &mut ctx.accounts.locker;

    // Authority & collaborators
    locker.authority = ctx.accounts.authority.key();
    locker.stake_mint = ctx.accounts.stake_mint.key();
    locker.reward_mint = ctx.accounts.reward_mint.key();
    locker.lp_mint = ctx.accounts.lp_mint.key();
    locker.native_mint = ctx.accounts.native_mint.key();
    locker.reward_vault = ctx.accounts.reward_vault.key();
    locker.liquidity_adapter = ctx.accounts.liquidity_adapter.key();

    locker.stake_custody = ctx.accounts.stake_custody.key();
    locker.native_custody = ctx.accounts.native_custody.key();
    locker.lp_lock_vault = ctx.accounts.lp_lock_vault.key();

    // Parameters
    locker.lp_to_reward_ratio = params.lp_to_reward_ratio;
    locker.lp_divisor = params.lp_divisor;
    locker.reward_supply_cap = params.reward_supply_cap;
    locker.min_stake_amount = params.min_stake_amount;
    locker.min_native_amount = params.min_native_amount;
    locker.max_slippage_bps = params.max_slippage_bps;
    locker.default_slippage_bps = params.default_slippage_bps;
    locker.mev_protection_enabled = params.mev_protection_enabled;
    locker.min_time_between_txs = params.min_time_between_txs;
    locker.max_tx_per_user_per_block = params.max_tx_per_user_per_block;

    locker.validate_params()?;

    // Aggregates
    locker.total_locked_lp = 0;
    locker.total_reward_issued = 0;
    locker.total_reward_deposited = 0;
    locker.lock_count = 0;

    locker.is_paused = false;
    locker.in_flight = false;

    // Bumps
    locker.bump = ctx.bumps.locker;
    locker.stake_custody_bump = ctx.bumps.stake_custody;
    locker.native_custody_bump = ctx.bumps.native_custody;
    locker.lp_lock_bump = ctx.bumps.lp_lock_vault;
    locker.custody_authority_bump = ctx.bumps.custody_authority;

    msg!(
        "Locker initialized: lp_mint={}, reward_mint={}, ratio={}/{}",
        locker.lp_mint,
        locker.reward_mint,
        locker.lp_to_reward_ratio,
        locker.lp_divisor
    );

    emit!(LockerInitialized {
        locker: locker.key(),
        authority: locker.authority,
        lp_mint: locker.lp_mint,
        reward_mint: locker.reward_mint,
        reward_vault: locker.reward_vault,
        liquidity_adapter: locker.liquidity_adapter,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
