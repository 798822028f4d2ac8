// =============================================================================
// Instructions Module - VG Votes
// =============================================================================

pub mod admin;
pub mod delegation;
pub mod get_voting_power;
pub mod initialize_wrapper;
pub mod voting;

pub use admin::*;
pub use delegation::*;
pub use get_voting_power::*;
pub use initialize_wrapper::*;
pub use voting::*;
