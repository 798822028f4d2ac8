// =============================================================================
// Fund Vault Instructions
// =============================================================================
// Two ways VG reaches the reward vault:
// - fund_vault:   anyone transfers VG they hold into the vault
// - mint_to_vault: the authority mints fresh VG into the vault, when the
//                  locker PDA is the VG mint authority and a supply cap is set
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::LockerError;
use crate::events::VaultFunded;
use crate::state::{AuthorityCapability, Locker};

// =============================================================================
// Fund Vault
// =============================================================================

/// Accounts required for the fund_vault instruction
#[derive(Accounts)]
pub struct FundVault<'info> {
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump
    )]
    pub locker: Box<Account<'info, Locker>>,

    #[account(
        mut,
        token::mint = locker.reward_mint,
        token::authority = funder
    )]
    pub funder_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = locker.reward_vault @ LockerError::InvalidVault
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Handler for the fund_vault instruction
pub fn handler_fund_vault(ctx: Context<FundVault>, amount: u64) -> Result<()> {
    require!(amount > 0, LockerError::InvalidAmount);
    require!(
        ctx.accounts.funder_reward_account.amount >= amount,
        LockerError::InsufficientBalance
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder_reward_account.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    let locker = &mut ctx.accounts.locker;
    locker.record_deposit(amount)?;

    msg!(
        "Vault funded with {} VG by {}",
        amount,
        ctx.accounts.funder.key()
    );

    emit!(VaultFunded {
        locker: locker.key(),
        funder: ctx.accounts.funder.key(),
        amount,
        minted: false,
        total_reward_deposited: locker.total_reward_deposited,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Mint To Vault
// =============================================================================

/// Accounts required for the mint_to_vault instruction
#[derive(Accounts)]
pub struct MintToVault<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump
    )]
    pub locker: Box<Account<'info, Locker>>,

    #[account(
        mut,
        address = locker.reward_mint @ LockerError::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        address = locker.reward_vault @ LockerError::InvalidVault
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Handler for the mint_to_vault instruction
pub fn handler_mint_to_vault(ctx: Context<MintToVault>, amount: u64) -> Result<()> {
    require!(amount > 0, LockerError::InvalidAmount);

    let capability = AuthorityCapability::from_signer(&ctx.accounts.authority);
    ctx.accounts.locker.authorize(&capability)?;

    require!(
        ctx.accounts.reward_mint.mint_authority == COption::Some(ctx.accounts.locker.key()),
        LockerError::Unauthorized
    );
    ctx.accounts
        .locker
        .check_supply_cap(ctx.accounts.reward_mint.supply, amount)?;

    let lp_mint_key = ctx.accounts.locker.lp_mint;
    let locker_seeds = &[
        LOCKER_SEED,
        lp_mint_key.as_ref(),
        &[ctx.accounts.locker.bump],
    ];
    let signer_seeds = &[&locker_seeds[..]];

    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.reward_mint.to_account_info(),
                to: ctx.accounts.reward_vault.to_account_info(),
                authority: ctx.accounts.locker.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    let locker = &mut ctx.accounts.locker;
    locker.record_deposit(amount)?;

    msg!("Minted {} VG into the reward vault", amount);

    emit!(VaultFunded {
        locker: locker.key(),
        funder: ctx.accounts.authority.key(),
        amount,
        minted: true,
        total_reward_deposited: locker.total_reward_deposited,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
