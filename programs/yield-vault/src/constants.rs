// Constants for the Yield Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for vault authority PDA
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for strategy state PDA
pub const STRATEGY_SEED: &[u8] = b"strategy";

/// Space for Vault account (8 discriminator + 32 authority + 32 asset_mint +
/// 32 share_mint + 32 strategy + 1 paused + 1 locked + 1 bump + 1 share_bump +
/// 1 authority_bump + 64 padding)
pub const VAULT_SIZE: usize = 8 + 32 + 32 + 32 + 32 + 1 + 1 + 1 + 1 + 1 + 64;

/// Space for StrategyState account (8 discriminator + 32 vault +
/// 32 token_account + 8 managed_assets + 1 bump + 32 padding)
pub const STRATEGY_STATE_SIZE: usize = 8 + 32 + 32 + 8 + 1 + 32;
