// =============================================================================
// VG Locker Constants
// =============================================================================
// Seeds, limits and default parameters for the LP lock & reward program.
// Runtime parameters live on the Locker account; the values here are either
// fixed protocol limits or the defaults applied at initialization.
// =============================================================================

// =============================================================================
// BASIS POINTS
// =============================================================================

/// Total basis points (100%) - used as denominator in slippage calculations
/// Example: min_out = amount * (BPS_DENOMINATOR - slippage_bps) / BPS_DENOMINATOR
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Default maximum slippage a caller may request (5%)
pub const DEFAULT_MAX_SLIPPAGE_BPS: u16 = 500;

/// Slippage applied when the caller does not pass one (1%)
pub const DEFAULT_SLIPPAGE_BPS: u16 = 100;

// =============================================================================
// REWARD RATIO
// =============================================================================

/// Default reward per LP unit: reward = lp * 1000 / 1
pub const DEFAULT_LP_TO_REWARD_RATIO: u64 = 1_000;
pub const DEFAULT_LP_DIVISOR: u64 = 1;

// =============================================================================
// MINIMUM AMOUNTS
// =============================================================================

/// Minimum stake token per lock (1 token at 6 decimals)
pub const DEFAULT_MIN_STAKE_AMOUNT: u64 = 1_000_000;

/// Minimum native amount per lock (0.01 SOL)
pub const DEFAULT_MIN_NATIVE_AMOUNT: u64 = 10_000_000;

// =============================================================================
// MEV PROTECTION
// =============================================================================

/// Seconds a user must wait between two locks
pub const DEFAULT_MIN_TIME_BETWEEN_TXS: i64 = 30;

/// Locks a single user may perform within one slot
pub const DEFAULT_MAX_TX_PER_USER_PER_BLOCK: u16 = 1;

/// Upper bound for min_time_between_txs (1 day)
pub const MAX_MIN_TIME_BETWEEN_TXS: i64 = 86_400;

// =============================================================================
// LIQUIDITY ADAPTER
// =============================================================================

/// Deadline passed to the adapter, relative to the current unix timestamp
pub const PROVISION_DEADLINE_SECS: i64 = 60;

/// Anchor discriminator of the adapter's `provision` instruction
/// sha256("global:provision")[..8]
pub const PROVISION_DISCRIMINATOR: [u8; 8] = [65, 68, 246, 90, 108, 228, 90, 206];

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Full seed: ["locker", lp_mint]
pub const LOCKER_SEED: &[u8] = b"locker";

/// Full seed: ["custody_authority", locker]
/// Owns the custody accounts. The only signature the adapter call carries.
pub const CUSTODY_AUTHORITY_SEED: &[u8] = b"custody_authority";

/// Full seed: ["stake_custody", locker]
pub const STAKE_CUSTODY_SEED: &[u8] = b"stake_custody";

/// Full seed: ["native_custody", locker]
pub const NATIVE_CUSTODY_SEED: &[u8] = b"native_custody";

/// Full seed: ["lp_lock", locker]
/// Token account holding permanently locked LP. Nothing ever transfers out.
pub const LP_LOCK_SEED: &[u8] = b"lp_lock";

/// Full seed: ["reward_vault", locker]
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

/// Full seed: ["user_guard", locker, user]
pub const USER_GUARD_SEED: &[u8] = b"user_guard";
