use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Global vault state
///
/// Deliberately does NOT cache pool size or share supply: the pool is
/// derived on every read from the vault token account balance plus the
/// strategy's self-reported total, and supply is read from the share mint.
/// Donations (direct transfers into the vault token account) therefore
/// raise price-per-share without minting anything.
#[account]
pub struct Vault {
    /// Authority that can pause the vault and manage the strategy
    pub authority: Pubkey,

    /// Mint of the underlying asset token
    pub asset_mint: Pubkey,

    /// Mint of the vault share token
    pub share_mint: Pubkey,

    /// Wired strategy state, `Pubkey::default()` when none.
    /// Set at most once; never re-pointed after wiring.
    pub strategy: Pubkey,

    /// Circuit breaker: gates the four entry operations, nothing else
    pub paused: bool,

    /// Reentrancy barrier for the mutating entry points
    pub locked: bool,

    /// Bump seed for vault state PDA
    pub bump: u8,

    /// Bump seed for share mint PDA
    pub share_bump: u8,

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,

    // Padding for future upgrades
    pub _reserved: [u8; 64],
}

/// Self-accounted strategy position for one vault
///
/// `managed_assets` is trusted by the engine; the only defense against a
/// misreporting strategy is the balance-delta check on every withdrawal.
#[account]
pub struct StrategyState {
    /// Vault this strategy is wired to (immutable after init)
    pub vault: Pubkey,

    /// Token account where deployed assets sit
    pub token_account: Pubkey,

    /// Self-reported total of assets under management
    pub managed_assets: u64,

    /// Bump seed for strategy state PDA
    pub bump: u8,

    // Padding for future upgrades
    pub _reserved: [u8; 32],
}

impl Vault {
    pub fn has_strategy(&self) -> bool {
        self.strategy != Pubkey::default()
    }
}

/// Resolve the strategy-managed total for a vault.
///
/// When the vault has a strategy wired the matching account must be
/// supplied; when it has none, none may be supplied. This keeps every
/// `total_assets` read honest about the delegated portion of the pool.
pub fn resolve_managed_assets<'info>(
    vault: &Vault,
    strategy: Option<&Account<'info, StrategyState>>,
) -> Result<u64> {
    match strategy {
        Some(state) => {
            require!(vault.has_strategy(), VaultError::StrategyNotSet);
            require_keys_eq!(state.key(), vault.strategy, VaultError::InvalidStrategy);
            Ok(state.managed_assets)
        }
        None => {
            require!(!vault.has_strategy(), VaultError::StrategyNotSet);
            Ok(0)
        }
    }
}

/// Pool size: idle balance plus whatever the strategy claims to manage.
pub fn total_assets(idle: u64, managed: u64) -> Result<u64> {
    idle.checked_add(managed)
        .ok_or_else(|| error!(VaultError::MathOverflow))
}
