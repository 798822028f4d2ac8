use anchor_lang::prelude::*;

#[error_code]
pub enum VotesError {
    // Voting State Errors (6000-6009)
    #[msg("Voting is not enabled for this holder")]
    NotActive,

    #[msg("Holder has not registered for voting")]
    NotRegistered,

    #[msg("Voting power is delegated; undelegate first")]
    AlreadyDelegated,

    #[msg("Voting power is not delegated")]
    NotDelegated,

    // Delegation Errors (6010-6019)
    #[msg("Cannot delegate to self")]
    SelfDelegation,

    #[msg("Delegation chains are not allowed")]
    DelegationChain,

    #[msg("Delegatee record does not match the current delegation")]
    InvalidDelegatee,

    // Configuration Errors (6020-6029)
    #[msg("Invalid exchange rate")]
    InvalidExchangeRate,

    #[msg("Record belongs to a different voting wrapper")]
    InvalidWrapper,

    // Authorization Errors (6030-6039)
    #[msg("Unauthorized: authority only")]
    Unauthorized,

    #[msg("Invalid authority")]
    InvalidAuthority,

    // Math Errors (6040-6049)
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,

    // Account Validation Errors (6050-6059)
    #[msg("Invalid VG mint")]
    InvalidVgMint,
}
