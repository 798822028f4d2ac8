// =============================================================================
// Instructions Module
// =============================================================================
// This module exports all instructions of the VG Locker program.
// =============================================================================

// Setup
pub mod initialize_locker;

// Core lock flow
pub mod lock_and_earn;

// Reward vault
pub mod fund_vault;

// Admin operations
pub mod admin;

// Views
pub mod get_config;

// Re-export everything from each module
// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use fund_vault::*;
pub use get_config::*;
pub use initialize_locker::*;
pub use lock_and_earn::*;
