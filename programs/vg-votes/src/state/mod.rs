pub mod voter_record;
pub mod voting_wrapper;

pub use voter_record::*;
pub use voting_wrapper::*;
