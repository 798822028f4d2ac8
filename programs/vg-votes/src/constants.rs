// =============================================================================
// VG Votes Constants
// =============================================================================

// PDA Seeds
pub const VOTING_WRAPPER_SEED: &[u8] = b"voting_wrapper";
pub const VOTER_SEED: &[u8] = b"voter";

// Fixed point precision of the VG -> voting power exchange rate (9 decimals)
// voting_power = vg_balance * exchange_rate / RATE_PRECISION
pub const RATE_PRECISION: u128 = 1_000_000_000; // 10^9

// 1 VG = 1 vote
pub const DEFAULT_EXCHANGE_RATE: u64 = 1_000_000_000;

// Upper bound for the exchange rate (1 VG = 1000 votes)
pub const MAX_EXCHANGE_RATE: u64 = 1_000_000_000_000;
