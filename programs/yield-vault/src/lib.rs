// Yield Vault - share-based custodial vault for a single SPL asset
// Accounting: pool size is derived on every read (idle balance + strategy
// total), conversions always round in the vault's favor, and every
// transfer boundary is verified by balance delta rather than trusted.

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod yield_vault {
    use super::*;

    /// Initialize a new vault for a given asset token
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// Wire a strategy to the vault (authority only, exactly once)
    pub fn initialize_strategy(ctx: Context<InitializeStrategy>) -> Result<()> {
        instructions::strategy::initialize_strategy(ctx)
    }

    /// Deposit assets and receive shares priced by the observed balance
    /// delta (floor rounding). Returns shares minted.
    pub fn deposit(ctx: Context<Deposit>, assets: u64) -> Result<u64> {
        instructions::deposit::handler(ctx, assets)
    }

    /// Mint an exact share amount, paying the required assets (ceiling
    /// rounding). Returns assets consumed.
    pub fn mint(ctx: Context<MintShares>, shares: u64) -> Result<u64> {
        instructions::mint_shares::handler(ctx, shares)
    }

    /// Withdraw an exact asset amount, burning the required shares
    /// (ceiling rounding). Returns shares burned.
    pub fn withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<u64> {
        instructions::withdraw::handler(ctx, assets)
    }

    /// Redeem an exact share amount for assets (floor rounding).
    /// Returns assets paid out.
    pub fn redeem(ctx: Context<Redeem>, shares: u64) -> Result<u64> {
        instructions::redeem::handler(ctx, shares)
    }

    /// Deploy idle assets to the wired strategy (authority only).
    /// Moves backing, never shares.
    pub fn deploy_to_strategy(ctx: Context<MoveStrategyFunds>, amount: u64) -> Result<()> {
        instructions::strategy::deploy_to_strategy(ctx, amount)
    }

    /// Pull assets back from the strategy into idle custody, verifying
    /// the exact delivered amount (authority only)
    pub fn withdraw_from_strategy(ctx: Context<MoveStrategyFunds>, amount: u64) -> Result<()> {
        instructions::strategy::withdraw_from_strategy(ctx, amount)
    }

    /// Record a strategy gain, raising price-per-share for all holders
    pub fn report_gain(ctx: Context<ReportStrategy>, amount: u64) -> Result<()> {
        instructions::strategy::report_gain(ctx, amount)
    }

    /// Record a strategy loss, socialized across all holders through the
    /// shared conversion ratio
    pub fn report_loss(ctx: Context<ReportStrategy>, amount: u64) -> Result<()> {
        instructions::strategy::report_loss(ctx, amount)
    }

    /// Engage the circuit breaker (authority only)
    pub fn pause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    /// Release the circuit breaker (authority only)
    pub fn unpause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    // ============ Views (usable while paused) ============

    /// Shares a deposit of `assets` would mint right now
    pub fn preview_deposit(ctx: Context<VaultView>, assets: u64) -> Result<u64> {
        instructions::view::preview_deposit(ctx, assets)
    }

    /// Assets required to mint `shares` right now
    pub fn preview_mint(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
        instructions::view::preview_mint(ctx, shares)
    }

    /// Shares a withdrawal of `assets` would burn right now
    pub fn preview_withdraw(ctx: Context<VaultView>, assets: u64) -> Result<u64> {
        instructions::view::preview_withdraw(ctx, assets)
    }

    /// Assets redeeming `shares` would pay right now
    pub fn preview_redeem(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
        instructions::view::preview_redeem(ctx, shares)
    }

    /// Convert assets to shares at the current ratio (floor)
    pub fn convert_to_shares(ctx: Context<VaultView>, assets: u64) -> Result<u64> {
        instructions::view::convert_to_shares_view(ctx, assets)
    }

    /// Convert shares to assets at the current ratio (floor)
    pub fn convert_to_assets(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
        instructions::view::convert_to_assets_view(ctx, shares)
    }

    /// Current pool size: idle balance plus strategy-reported total
    pub fn total_assets(ctx: Context<VaultView>) -> Result<u64> {
        instructions::view::get_total_assets(ctx)
    }

    /// Deposit capacity (unlimited, 0 while paused)
    pub fn max_deposit(ctx: Context<VaultView>) -> Result<u64> {
        instructions::view::max_deposit(ctx)
    }

    /// Mint capacity (unlimited, 0 while paused)
    pub fn max_mint(ctx: Context<VaultView>) -> Result<u64> {
        instructions::view::max_mint(ctx)
    }

    /// Maximum assets the holder can withdraw without overdrawing shares
    pub fn max_withdraw(ctx: Context<VaultViewWithOwner>) -> Result<u64> {
        instructions::view::max_withdraw(ctx)
    }

    /// Maximum shares the holder can redeem (raw share balance)
    pub fn max_redeem(ctx: Context<VaultViewWithOwner>) -> Result<u64> {
        instructions::view::max_redeem(ctx)
    }
}
