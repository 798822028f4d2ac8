// =============================================================================
// State Module
// =============================================================================
// Account structures owned by the VG Locker program:
// - Locker: configuration record and aggregate counters
// - UserGuard: per-user rate limiting
// =============================================================================

pub mod locker;
pub mod user_guard;

pub use locker::*;
pub use user_guard::*;
