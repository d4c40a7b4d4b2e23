use anchor_lang::prelude::*;

/// Custom error codes for the Yield Vault program
///
/// Every failure reports a single specific kind so callers can distinguish,
/// e.g., "paused" from "insufficient liquidity".
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Insufficient share balance for the requested operation")]
    InsufficientShares,

    #[msg("Caller is not an approved delegate or lacks delegated shares")]
    InsufficientAllowance,

    #[msg("Vault is paused")]
    VaultPaused,

    #[msg("Deploy amount exceeds idle vault balance")]
    InsufficientIdleLiquidity,

    #[msg("Strategy did not deliver the exact requested amount")]
    InsufficientStrategyLiquidity,

    #[msg("Observed balance delta differs from expected transfer amount")]
    TransferAmountMismatch,

    #[msg("Unauthorized - only vault authority can perform this action")]
    Unauthorized,

    #[msg("Reentrant call into a guarded vault operation")]
    ReentrantCall,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Cannot divide by zero - vault has no backing assets")]
    DivisionByZero,

    #[msg("Invalid token mint - does not match vault configuration")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Strategy account does not match the wired strategy")]
    InvalidStrategy,

    #[msg("Vault already has a strategy wired")]
    StrategyAlreadySet,

    #[msg("Vault has no strategy wired")]
    StrategyNotSet,
}
