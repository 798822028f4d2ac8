// =============================================================================
// Liquidity Provisioning Adapter
// =============================================================================
// Wraps the single external call of lock_and_earn: turning custody stake
// tokens and wrapped SOL into LP tokens delivered to the LP lock vault.
//
// The adapter program exposes an Anchor-style `provision` instruction:
//
//   data:     PROVISION_DISCRIMINATOR ++ borsh(ProvisionArgs)
//   accounts: [custody_authority (signer), stake_custody, native_custody,
//              lp_lock_vault, stake_mint, native_mint, lp_mint, token_program,
//              ...pool specific accounts (remaining_accounts)]
//
// The call is signed by the custody authority PDA alone. The locker PDA,
// which owns the LP lock vault and the reward vault, never signs it.
//
// The adapter's return values are not trusted. What was spent and what was
// received is measured from custody and vault balances before and after
// the call.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};

use crate::constants::{PROVISION_DEADLINE_SECS, PROVISION_DISCRIMINATOR};
use crate::error::LockerError;
use crate::state::min_after_slippage;

/// Arguments of the adapter's `provision` instruction
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProvisionArgs {
    pub token_amount: u64,
    pub native_amount: u64,
    pub min_token: u64,
    pub min_native: u64,
    pub deadline: i64,
}

impl ProvisionArgs {
    pub fn new(token_amount: u64, native_amount: u64, slippage_bps: u16, now: i64) -> Result<Self> {
        Ok(Self {
            token_amount,
            native_amount,
            min_token: min_after_slippage(token_amount, slippage_bps)?,
            min_native: min_after_slippage(native_amount, slippage_bps)?,
            deadline: now
                .checked_add(PROVISION_DEADLINE_SECS)
                .ok_or(LockerError::MathOverflow)?,
        })
    }

    /// Serialized instruction data: discriminator followed by the borsh args
    pub fn instruction_data(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(8 + 8 * 5);
        data.extend_from_slice(&PROVISION_DISCRIMINATOR);
        self.serialize(&mut data)
            .map_err(|_| error!(LockerError::ProvisioningFailed))?;
        Ok(data)
    }
}

/// Balances the locker observes around the adapter call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub stake_custody: u64,
    pub native_custody: u64,
    pub lp_lock_vault: u64,
    pub reward_vault: u64,
}

/// What the adapter call achieved, measured from balances
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProvisionOutcome {
    pub token_spent: u64,
    pub native_spent: u64,
    pub lp_received: u64,
}

impl ProvisionOutcome {
    pub fn measure(before: &BalanceSnapshot, after: &BalanceSnapshot) -> Result<Self> {
        // The adapter has no business with the reward vault
        require!(
            after.reward_vault == before.reward_vault,
            LockerError::ProvisioningFailed
        );

        // Custody can only shrink and the LP vault can only grow across the call
        let token_spent = before
            .stake_custody
            .checked_sub(after.stake_custody)
            .ok_or(LockerError::ProvisioningFailed)?;
        let native_spent = before
            .native_custody
            .checked_sub(after.native_custody)
            .ok_or(LockerError::ProvisioningFailed)?;
        let lp_received = after
            .lp_lock_vault
            .checked_sub(before.lp_lock_vault)
            .ok_or(LockerError::ProvisioningFailed)?;

        Ok(Self {
            token_spent,
            native_spent,
            lp_received,
        })
    }

    /// Enforce the slippage floors and the caller's minimum LP
    pub fn validate(&self, args: &ProvisionArgs, min_lp_out: u64) -> Result<()> {
        require!(self.lp_received > 0, LockerError::ProvisioningFailed);

        require!(
            self.token_spent <= args.token_amount && self.native_spent <= args.native_amount,
            LockerError::ProvisioningFailed
        );

        require!(
            self.token_spent >= args.min_token,
            LockerError::SlippageExceeded
        );
        require!(
            self.native_spent >= args.min_native,
            LockerError::SlippageExceeded
        );
        require!(
            self.lp_received >= min_lp_out,
            LockerError::SlippageExceeded
        );

        Ok(())
    }
}

/// Account metas for the adapter call.
///
/// `signer` is marked as a read-only signer; every other account keeps the
/// signer and writable flags it arrived with.
pub fn provision_metas(accounts: &[AccountInfo<'_>], signer: &Pubkey) -> Vec<AccountMeta> {
    accounts
        .iter()
        .map(|acc| {
            if acc.key == signer {
                AccountMeta::new_readonly(*acc.key, true)
            } else if acc.is_writable {
                AccountMeta::new(*acc.key, acc.is_signer)
            } else {
                AccountMeta::new_readonly(*acc.key, acc.is_signer)
            }
        })
        .collect()
}

/// Invoke the adapter's `provision` instruction, signing as the custody
/// authority PDA.
///
/// `accounts` must start with the fixed adapter accounts in interface order;
/// pool specific accounts follow.
pub fn invoke_provision<'info>(
    adapter_program: &AccountInfo<'info>,
    accounts: &[AccountInfo<'info>],
    custody_authority: &Pubkey,
    args: &ProvisionArgs,
    custody_signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let instruction = Instruction {
        program_id: *adapter_program.key,
        accounts: provision_metas(accounts, custody_authority),
        data: args.instruction_data()?,
    };

    let mut account_infos = accounts.to_vec();
    account_infos.push(adapter_program.clone());

    invoke_signed(&instruction, &account_infos, custody_signer_seeds).map_err(|e| {
        msg!("Liquidity adapter CPI failed: {:?}", e);
        LockerError::ProvisioningFailed
    })?;

    Ok(())
}
