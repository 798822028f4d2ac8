// =============================================================================
// VG Locker Error Codes
// =============================================================================
// Every failure of lock_and_earn maps to exactly one of these. None of them is
// a catch-all: a caller can always tell which precondition or dependency
// failed.
// =============================================================================

use anchor_lang::prelude::*;

/// All possible errors that the VG Locker program can return.
///
/// Anchor assigns codes starting from 6000 in declaration order.
#[error_code]
pub enum LockerError {
    // =========================================================================
    // Locker State Errors
    // =========================================================================

    /// The locker has been paused by its authority
    #[msg("Locker is currently paused")]
    LockerPaused,

    /// A lock_and_earn call re-entered while the adapter call was in flight
    #[msg("Re-entrant call rejected while liquidity provisioning is in flight")]
    ReentrantCall,

    // =========================================================================
    // Validation Errors
    // =========================================================================

    /// Stake or native amount is below the configured minimum
    #[msg("Amount is below the configured minimum")]
    BelowMinimum,

    /// Requested slippage is zero or above the configured maximum
    #[msg("Slippage must be greater than zero and within the configured maximum")]
    InvalidSlippage,

    /// Amounts achieved by the adapter fell below the slippage-adjusted minimum
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,

    /// A configuration update would break a locker invariant
    #[msg("Invalid configuration value")]
    InvalidConfig,

    /// Amount must be greater than zero
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    // =========================================================================
    // Authorization Errors
    // =========================================================================

    /// Caller is not the locker authority, or the vault does not authorize the locker
    #[msg("Unauthorized")]
    Unauthorized,

    /// Too many locks from the same user in the current slot or time window
    #[msg("Rate limited: wait before locking again")]
    RateLimited,

    /// New authority is the default key or the current authority
    #[msg("Invalid authority")]
    InvalidAuthority,

    // =========================================================================
    // Resource Errors
    // =========================================================================

    /// The reward vault cannot cover the reward
    #[msg("Insufficient reward reserve in vault")]
    InsufficientVaultReserve,

    /// Caller does not hold enough stake tokens or lamports
    #[msg("Insufficient balance for operation")]
    InsufficientBalance,

    /// Delegated amount on a token account does not cover the transfer
    #[msg("Insufficient allowance for operation")]
    InsufficientAllowance,

    /// Minting would exceed the configured reward supply cap
    #[msg("Reward supply cap exceeded")]
    SupplyCapExceeded,

    // =========================================================================
    // External Dependency Errors
    // =========================================================================

    /// Pulling tokens or lamports into custody failed
    #[msg("Token transfer failed")]
    TransferFailed,

    /// The liquidity adapter call failed or produced no LP
    #[msg("Liquidity provisioning failed")]
    ProvisioningFailed,

    /// The adapter account passed does not match the configured adapter program
    #[msg("Liquidity adapter does not match configuration")]
    InvalidAdapter,

    /// Vault balance after disbursement does not match the expected balance
    #[msg("Reward vault balance mismatch after disbursement")]
    VaultMismatch,

    // =========================================================================
    // Account Validation Errors
    // =========================================================================

    #[msg("Invalid stake mint")]
    InvalidStakeMint,

    #[msg("Invalid reward mint")]
    InvalidRewardMint,

    #[msg("Invalid reward vault")]
    InvalidVault,

    // =========================================================================
    // Math Errors
    // =========================================================================

    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    #[msg("Math underflow - result would be negative")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,
}
