use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a strategy is wired to a vault
#[event]
pub struct StrategyInitialized {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited for shares
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when shares are burned for assets
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when the pause circuit breaker is toggled
#[event]
pub struct PauseToggled {
    pub vault: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}

/// Event emitted when idle assets are deployed to the strategy
#[event]
pub struct StrategyDeployed {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub amount: u64,
    pub managed_assets: u64,
    pub timestamp: i64,
}

/// Event emitted when assets are pulled back from the strategy
#[event]
pub struct StrategyWithdrawn {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub amount: u64,
    pub managed_assets: u64,
    pub timestamp: i64,
}

/// Event emitted when a user withdrawal forced a strategy unwind
#[event]
pub struct StrategyShortfallCovered {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub shortfall: u64,
    pub managed_assets: u64,
    pub timestamp: i64,
}

/// Event emitted when the strategy reports a gain or loss
#[event]
pub struct StrategyReported {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub gain: bool,
    pub amount: u64,
    pub managed_assets: u64,
    pub timestamp: i64,
}
