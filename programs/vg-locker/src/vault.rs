// =============================================================================
// Reward Vault
// =============================================================================
// The vault is a VG token account. It holds funds and releases them only to
// the locker PDA's signature; it never goes negative.
//
// Two layouts are accepted:
// - owned: the locker PDA owns the vault (default, ["reward_vault", locker])
// - delegated: an external account owns the vault and approved the locker
//   PDA as delegate; the approved amount caps what can be disbursed
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::error::LockerError;

/// What the locker may draw from a vault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultReserve {
    pub balance: u64,
    /// Approved amount when the locker is a delegate, `None` when it owns the vault
    pub allowance: Option<u64>,
}

impl VaultReserve {
    /// Resolve the reserve for `locker`.
    ///
    /// Returns `None` when the locker is neither the owner nor the delegate.
    pub fn resolve(
        locker: &Pubkey,
        owner: &Pubkey,
        delegate: Option<&Pubkey>,
        delegated_amount: u64,
        balance: u64,
    ) -> Option<Self> {
        if owner == locker {
            return Some(Self {
                balance,
                allowance: None,
            });
        }

        match delegate {
            Some(delegate) if delegate == locker => Some(Self {
                balance,
                allowance: Some(delegated_amount),
            }),
            _ => None,
        }
    }

    /// Resolve the reserve of an SPL token account
    pub fn of(vault: &TokenAccount, locker: &Pubkey) -> Option<Self> {
        let delegate = match &vault.delegate {
            COption::Some(delegate) => Some(delegate),
            COption::None => None,
        };

        Self::resolve(
            locker,
            &vault.owner,
            delegate,
            vault.delegated_amount,
            vault.amount,
        )
    }

    /// Largest amount a single disbursement could draw
    pub fn available(&self) -> u64 {
        match self.allowance {
            Some(allowance) => self.balance.min(allowance),
            None => self.balance,
        }
    }

    /// Check a disbursement and return the vault balance expected afterwards.
    ///
    /// A request above the reserve is rejected, never clamped.
    pub fn plan_disbursement(&self, amount: u64) -> Result<u64> {
        let new_balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LockerError::InsufficientVaultReserve)?;

        if let Some(allowance) = self.allowance {
            require!(amount <= allowance, LockerError::InsufficientAllowance);
        }

        Ok(new_balance)
    }
}

/// Transfer `amount` VG from the vault to `to`, signed by the locker PDA.
///
/// Returns the vault's balance after the transfer, verified against the
/// reloaded account.
pub fn disburse<'info>(
    token_program: &Program<'info, Token>,
    vault: &mut Account<'info, TokenAccount>,
    to: AccountInfo<'info>,
    locker: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<u64> {
    let reserve = VaultReserve::of(vault, locker.key).ok_or(LockerError::Unauthorized)?;
    let expected_balance = reserve.plan_disbursement(amount)?;

    if amount == 0 {
        return Ok(vault.amount);
    }

    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: vault.to_account_info(),
                to,
                authority: locker,
            },
            signer_seeds,
        ),
        amount,
    )?;

    vault.reload()?;
    require!(
        vault.amount == expected_balance,
        LockerError::VaultMismatch
    );

    msg!("Vault disbursed {} VG, remaining {}", amount, vault.amount);

    Ok(vault.amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn code(err: anchor_lang::error::Error) -> u32 {
        match err {
            anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn owned_vault_exposes_full_balance() {
        let locker = key(1);
        let reserve = VaultReserve::resolve(&locker, &locker, None, 0, 700).unwrap();

        assert_eq!(reserve.allowance, None);
        assert_eq!(reserve.available(), 700);
    }

    #[test]
    fn delegated_vault_is_capped_by_approval() {
        let locker = key(1);
        let owner = key(2);

        let reserve = VaultReserve::resolve(&locker, &owner, Some(&locker), 300, 700).unwrap();
        assert_eq!(reserve.available(), 300);
        assert_eq!(reserve.plan_disbursement(300).unwrap(), 400);

        let err = reserve.plan_disbursement(301).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InsufficientAllowance));
    }

    #[test]
    fn foreign_vault_is_not_available() {
        let locker = key(1);
        let owner = key(2);

        assert_eq!(VaultReserve::resolve(&locker, &owner, None, 0, 700), None);
        assert_eq!(
            VaultReserve::resolve(&locker, &owner, Some(&key(3)), 700, 700),
            None
        );
    }

    #[test]
    fn disbursement_never_goes_negative() {
        let reserve = VaultReserve {
            balance: 100,
            allowance: None,
        };

        assert_eq!(reserve.plan_disbursement(40).unwrap(), 60);
        assert_eq!(reserve.plan_disbursement(100).unwrap(), 0);

        let err = reserve.plan_disbursement(150).unwrap_err();
        assert_eq!(code(err), u32::from(LockerError::InsufficientVaultReserve));
    }
}
