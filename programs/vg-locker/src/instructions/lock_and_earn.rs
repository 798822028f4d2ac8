// =============================================================================
// Lock And Earn Instruction
// =============================================================================
// Converts a caller's stake token + native SOL into LP through the liquidity
// adapter, locks the LP forever and pays VG from the reward vault.
//
// Flow:
// 1. Admission (paused, in flight), validate request (minimums, slippage,
//    balances)
// 2. Rate/abuse guard check
// 3. Best-effort vault pre-check against the caller's min_lp_out
// 4. Pull stake token and native SOL into locker custody
// 5. Commit guard state, latch in_flight, persist accounts
// 6. Adapter CPI signed by the custody authority only
// 7. Settle: measure LP received and amounts spent, enforce slippage
// 8. Refund unspent custody to the caller
// 9. Disburse reward = lp * ratio / divisor from the vault
// 10. Update aggregates, clear in_flight, emit LpLocked
//
// Every error aborts the transaction; the runtime reverts every transfer,
// the adapter call and all state writes together.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer as SystemTransfer};
use anchor_spl::token::{self, Mint, SyncNative, Token, TokenAccount, Transfer};

use crate::adapter::{self, BalanceSnapshot, ProvisionArgs};
use crate::constants::*;
use crate::custody::{CustodyReceipt, Refund};
use crate::error::LockerError;
use crate::events::LpLocked;
use crate::state::{Locker, UserGuard};
use crate::vault::{self, VaultReserve};

/// Accounts required for the lock_and_earn instruction
///
/// Pool specific accounts the adapter needs are passed via remaining_accounts,
/// in the order the adapter expects them.
#[derive(Accounts)]
pub struct LockAndEarn<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The user locking liquidity; signs for the stake and lamport transfers
    #[account(mut)]
    pub caller: Signer<'info>,

    // =========================================================================
    // Locker Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [LOCKER_SEED, locker.lp_mint.as_ref()],
        bump = locker.bump
    )]
    pub locker: Box<Account<'info, Locker>>,

    /// Caller's rate limit state (created on first lock)
    #[account(
        init_if_needed,
        payer = caller,
        space = 8 + UserGuard::INIT_SPACE,
        seeds = [USER_GUARD_SEED, locker.key().as_ref(), caller.key().as_ref()],
        bump
    )]
    pub user_guard: Box<Account<'info, UserGuard>>,

    // =========================================================================
    // Token Mints
    // =========================================================================

    #[account(address = locker.stake_mint @ LockerError::InvalidStakeMint)]
    pub stake_mint: Box<Account<'info, Mint>>,

    #[account(address = locker.native_mint @ LockerError::InvalidConfig)]
    pub native_mint: Box<Account<'info, Mint>>,

    #[account(address = locker.lp_mint @ LockerError::InvalidConfig)]
    pub lp_mint: Box<Account<'info, Mint>>,

    #[account(address = locker.reward_mint @ LockerError::InvalidRewardMint)]
    pub reward_mint: Box<Account<'info, Mint>>,

    // =========================================================================
    // Caller Token Accounts
    // =========================================================================

    /// Source of the stake token, receives unspent stake back
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = caller
    )]
    pub caller_stake_account: Box<Account<'info, TokenAccount>>,

    /// Receives unspent native amount back as wrapped SOL
    #[account(
        mut,
        token::mint = native_mint,
        token::authority = caller
    )]
    pub caller_native_account: Box<Account<'info, TokenAccount>>,

    /// Receives the VG reward
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = caller
    )]
    pub caller_reward_account: Box<Account<'info, TokenAccount>>,

    // =========================================================================
    // Custody & Vaults
    // =========================================================================

    /// CHECK: Data-less PDA signer over the custody accounts
    #[account(
        seeds = [CUSTODY_AUTHORITY_SEED, locker.key().as_ref()],
        bump = locker.custody_authority_bump
    )]
    pub custody_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [STAKE_CUSTODY_SEED, locker.key().as_ref()],
        bump = locker.stake_custody_bump
    )]
    pub stake_custody: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [NATIVE_CUSTODY_SEED, locker.key().as_ref()],
        bump = locker.native_custody_bump
    )]
    pub native_custody: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [LP_LOCK_SEED, locker.key().as_ref()],
        bump = locker.lp_lock_bump
    )]
    pub lp_lock_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = locker.reward_vault @ LockerError::InvalidVault,
        token::mint = reward_mint
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    // =========================================================================
    // Programs
    // =========================================================================

    /// CHECK: Must be the configured liquidity adapter program
    #[account(address = locker.liquidity_adapter @ LockerError::InvalidAdapter)]
    pub liquidity_adapter: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

impl<'info> LockAndEarn<'info> {
    /// Move the caller's stake token and lamports into locker custody
    fn pull_into_custody(&self, stake_amount: u64, native_amount: u64) -> Result<CustodyReceipt> {
        token::transfer(
            CpiContext::new(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.caller_stake_account.to_account_info(),
                    to: self.stake_custody.to_account_info(),
                    authority: self.caller.to_account_info(),
                },
            ),
            stake_amount,
        )
        .map_err(|e| {
            msg!("Stake transfer into custody failed: {:?}", e);
            LockerError::TransferFailed
        })?;

        system_program::transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                SystemTransfer {
                    from: self.caller.to_account_info(),
                    to: self.native_custody.to_account_info(),
                },
            ),
            native_amount,
        )
        .map_err(|e| {
            msg!("Native transfer into custody failed: {:?}", e);
            LockerError::TransferFailed
        })?;

        // Lamports credited to a wSOL account only count once synced
        token::sync_native(CpiContext::new(
            self.token_program.to_account_info(),
            SyncNative {
                account: self.native_custody.to_account_info(),
            },
        ))
        .map_err(|e| {
            msg!("Native custody sync failed: {:?}", e);
            LockerError::TransferFailed
        })?;

        Ok(CustodyReceipt::new(stake_amount, native_amount))
    }

    /// Return unspent custody to the caller
    fn release_refund(&self, refund: &Refund, custody_signer_seeds: &[&[&[u8]]]) -> Result<()> {
        if refund.stake > 0 {
            token::transfer(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    Transfer {
                        from: self.stake_custody.to_account_info(),
                        to: self.caller_stake_account.to_account_info(),
                        authority: self.custody_authority.to_account_info(),
                    },
                    custody_signer_seeds,
                ),
                refund.stake,
            )?;
        }

        if refund.native > 0 {
            token::transfer(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    Transfer {
                        from: self.native_custody.to_account_info(),
                        to: self.caller_native_account.to_account_info(),
                        authority: self.custody_authority.to_account_info(),
                    },
                    custody_signer_seeds,
                ),
                refund.native,
            )?;
        }

        Ok(())
    }

    /// Accounts handed to the adapter, fixed interface accounts first
    fn adapter_accounts(&self, pool_accounts: &[AccountInfo<'info>]) -> Vec<AccountInfo<'info>> {
        let mut accounts = vec![
            self.custody_authority.to_account_info(),
            self.stake_custody.to_account_info(),
            self.native_custody.to_account_info(),
            self.lp_lock_vault.to_account_info(),
            self.stake_mint.to_account_info(),
            self.native_mint.to_account_info(),
            self.lp_mint.to_account_info(),
            self.token_program.to_account_info(),
        ];
        accounts.extend_from_slice(pool_accounts);
        accounts
    }

    fn reload_balances(&mut self) -> Result<BalanceSnapshot> {
        self.stake_custody.reload()?;
        self.native_custody.reload()?;
        self.lp_lock_vault.reload()?;
        self.reward_vault.reload()?;

        Ok(BalanceSnapshot {
            stake_custody: self.stake_custody.amount,
            native_custody: self.native_custody.amount,
            lp_lock_vault: self.lp_lock_vault.amount,
            reward_vault: self.reward_vault.amount,
        })
    }
}

/// Handler for the lock_and_earn instruction
///
/// # Arguments
/// * `ctx` - The instruction context with all accounts
/// * `stake_amount` - Stake token to provide (base units)
/// * `native_amount` - Lamports to provide
/// * `slippage_bps` - Accepted slippage, `None` for the configured default
/// * `min_lp_out` - Minimum LP the caller accepts (0 to skip)
pub fn handler_lock_and_earn<'info>(
    ctx: Context<'_, '_, 'info, 'info, LockAndEarn<'info>>,
    stake_amount: u64,
    native_amount: u64,
    slippage_bps: Option<u16>,
    min_lp_out: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let slot = clock.slot;

    ctx.accounts.locker.check_open()?;

    // =========================================================================
    // Input Validation
    // =========================================================================

    require!(
        stake_amount > 0 && native_amount > 0,
        LockerError::InvalidAmount
    );

    let locker = &ctx.accounts.locker;
    locker.check_minimums(stake_amount, native_amount)?;
    let slippage_bps = locker.resolve_slippage(slippage_bps)?;

    require!(
        ctx.accounts.caller_stake_account.amount >= stake_amount,
        LockerError::InsufficientBalance
    );
    require!(
        ctx.accounts.caller.lamports() >= native_amount,
        LockerError::InsufficientBalance
    );

    // =========================================================================
    // Rate/Abuse Guard
    // =========================================================================

    let guard_params = locker.guard_params();
    let locker_key = locker.key();
    let caller_key = ctx.accounts.caller.key();

    let user_guard = &mut ctx.accounts.user_guard;
    if user_guard.user == Pubkey::default() {
        user_guard.locker = locker_key;
        user_guard.user = caller_key;
        user_guard.bump = ctx.bumps.user_guard;
    }
    user_guard.check(&guard_params, now, slot)?;

    // =========================================================================
    // Vault Pre-check
    // =========================================================================

    // The adapter call cannot be undone by this program, so make sure the
    // vault can at least pay for the caller's minimum LP before making it.
    let reserve = VaultReserve::of(&ctx.accounts.reward_vault, &locker_key)
        .ok_or(LockerError::Unauthorized)?;
    let min_reward = ctx.accounts.locker.calculate_reward(min_lp_out)?;
    reserve.plan_disbursement(min_reward)?;

    msg!(
        "Locking: stake={}, native={}, slippage_bps={}, min_lp_out={}",
        stake_amount,
        native_amount,
        slippage_bps,
        min_lp_out
    );

    // =========================================================================
    // Acquire Custody
    // =========================================================================

    let receipt = ctx
        .accounts
        .pull_into_custody(stake_amount, native_amount)?;

    // =========================================================================
    // Commit Guard & Latch Before Leaving The Program
    // =========================================================================

    ctx.accounts.user_guard.record(now, slot)?;
    ctx.accounts.locker.in_flight = true;
    ctx.accounts.user_guard.exit(&crate::ID)?;
    ctx.accounts.locker.exit(&crate::ID)?;

    // =========================================================================
    // Liquidity Provisioning
    // =========================================================================

    let custody_seeds = &[
        CUSTODY_AUTHORITY_SEED,
        locker_key.as_ref(),
        &[ctx.accounts.locker.custody_authority_bump],
    ];
    let custody_signer_seeds = &[&custody_seeds[..]];

    let args = ProvisionArgs::new(stake_amount, native_amount, slippage_bps, now)?;
    let before = ctx.accounts.reload_balances()?;

    let adapter_accounts = ctx.accounts.adapter_accounts(ctx.remaining_accounts);
    adapter::invoke_provision(
        &ctx.accounts.liquidity_adapter.to_account_info(),
        &adapter_accounts,
        &ctx.accounts.custody_authority.key(),
        &args,
        custody_signer_seeds,
    )?;

    // =========================================================================
    // Settle Custody
    // =========================================================================

    let after = ctx.accounts.reload_balances()?;
    let settlement = ctx
        .accounts
        .locker
        .settle_provision(receipt, &args, &before, &after, min_lp_out)?;
    let outcome = settlement.outcome;

    msg!(
        "Provisioned: stake_spent={}, native_spent={}, lp_received={}",
        outcome.token_spent,
        outcome.native_spent,
        outcome.lp_received
    );

    let refund = settlement.refund;
    if !refund.is_empty() {
        ctx.accounts.release_refund(&refund, custody_signer_seeds)?;
        msg!("Refunded stake={}, native={}", refund.stake, refund.native);
    }

    // =========================================================================
    // Reward Disbursement
    // =========================================================================

    let reward = settlement.reward;

    let lp_mint_key = ctx.accounts.locker.lp_mint;
    let locker_seeds = &[
        LOCKER_SEED,
        lp_mint_key.as_ref(),
        &[ctx.accounts.locker.bump],
    ];
    let locker_signer_seeds = &[&locker_seeds[..]];

    let vault_balance = vault::disburse(
        &ctx.accounts.token_program,
        &mut ctx.accounts.reward_vault,
        ctx.accounts.caller_reward_account.to_account_info(),
        ctx.accounts.locker.to_account_info(),
        locker_signer_seeds,
        reward,
    )?;

    // =========================================================================
    // Update Aggregates
    // =========================================================================

    let locker = &mut ctx.accounts.locker;
    locker.record_lock(outcome.lp_received, reward)?;
    locker.in_flight = false;

    // =========================================================================
    // Log Results
    // =========================================================================

    msg!("Lock successful!");
    msg!("LP locked: {}", outcome.lp_received);
    msg!("VG reward: {}", reward);
    msg!("Vault remaining: {}", vault_balance);
    msg!("Total locked LP: {}", locker.total_locked_lp);
    msg!("Total VG issued: {}", locker.total_reward_issued);

    emit!(LpLocked {
        locker: locker_key,
        caller: caller_key,
        lp_amount: outcome.lp_received,
        reward_amount: reward,
        stake_spent: outcome.token_spent,
        native_spent: outcome.native_spent,
        slot,
        timestamp: now,
        total_locked_lp: locker.total_locked_lp,
        total_reward_issued: locker.total_reward_issued,
    });

    Ok(())
}
