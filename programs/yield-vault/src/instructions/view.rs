use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};

use crate::{constants::*, errors::*, math, math::Rounding, state::*};

/// Read-only vault context for previews, conversions and capacity queries
///
/// Deliberately has no pause constraint: previews stay invocable while the
/// circuit breaker is engaged. Each call re-derives the pool from live
/// balances, so a preview immediately followed by the entry operation (with
/// no state change in between) returns exactly what the operation does.
#[derive(Accounts)]
pub struct VaultView<'info> {
    /// Vault state PDA
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, Vault>,

    /// Share mint
    #[account(
        address = vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA validated by seeds, anchors the token account check
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account
    #[account(
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Strategy state, required iff the vault has one wired
    pub strategy_state: Option<Account<'info, StrategyState>>,
}

/// Read-only vault context plus a holder's share account
#[derive(Accounts)]
pub struct VaultViewWithOwner<'info> {
    /// Vault state PDA
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, Vault>,

    /// Share mint
    #[account(
        address = vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA validated by seeds, anchors the token account check
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account
    #[account(
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Strategy state, required iff the vault has one wired
    pub strategy_state: Option<Account<'info, StrategyState>>,

    /// Holder's share token account
    #[account(
        constraint = owner_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,
}

fn pool_and_supply(
    vault_state: &Account<Vault>,
    vault_token_account: &Account<TokenAccount>,
    strategy_state: Option<&Account<StrategyState>>,
    share_mint: &Account<Mint>,
) -> Result<(u64, u64)> {
    let managed = resolve_managed_assets(vault_state, strategy_state)?;
    let pool = total_assets(vault_token_account.amount, managed)?;
    Ok((pool, share_mint.supply))
}

pub fn preview_deposit(ctx: Context<VaultView>, assets: u64) -> Result<u64> {
    let (pool, supply) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    math::convert_to_shares(assets, pool, supply, Rounding::Floor)
}

pub fn preview_mint(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
    let (pool, supply) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    if supply == 0 {
        return Ok(shares);
    }
    math::mul_div(shares, pool, supply, Rounding::Ceiling)
}

pub fn preview_withdraw(ctx: Context<VaultView>, assets: u64) -> Result<u64> {
    let (pool, supply) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    math::convert_to_shares(assets, pool, supply, Rounding::Ceiling)
}

pub fn preview_redeem(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
    let (pool, supply) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    math::convert_to_assets(shares, pool, supply, Rounding::Floor)
}

pub fn convert_to_shares_view(ctx: Context<VaultView>, assets: u64) -> Result<u64> {
    let (pool, supply) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    math::convert_to_shares(assets, pool, supply, Rounding::Floor)
}

pub fn convert_to_assets_view(ctx: Context<VaultView>, shares: u64) -> Result<u64> {
    let (pool, supply) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    math::convert_to_assets(shares, pool, supply, Rounding::Floor)
}

pub fn get_total_assets(ctx: Context<VaultView>) -> Result<u64> {
    let (pool, _) = pool_and_supply(
        &ctx.accounts.vault_state,
        &ctx.accounts.vault_token_account,
        ctx.accounts.strategy_state.as_ref(),
        &ctx.accounts.share_mint,
    )?;
    Ok(pool)
}

pub fn max_deposit(ctx: Context<VaultView>) -> Result<u64> {
    if ctx.accounts.vault_state.paused {
        return Ok(0);
    }
    Ok(u64::MAX)
}

pub fn max_mint(ctx: Context<VaultView>) -> Result<u64> {
    if ctx.accounts.vault_state.paused {
        return Ok(0);
    }
    Ok(u64::MAX)
}

pub fn max_withdraw(ctx: Context<VaultViewWithOwner>) -> Result<u64> {
    if ctx.accounts.vault_state.paused {
        return Ok(0);
    }
    let managed = resolve_managed_assets(
        &ctx.accounts.vault_state,
        ctx.accounts.strategy_state.as_ref(),
    )?;
    let pool = total_assets(ctx.accounts.vault_token_account.amount, managed)?;
    math::max_withdraw_assets(
        ctx.accounts.owner_share_account.amount,
        pool,
        ctx.accounts.share_mint.supply,
    )
}

pub fn max_redeem(ctx: Context<VaultViewWithOwner>) -> Result<u64> {
    if ctx.accounts.vault_state.paused {
        return Ok(0);
    }
    Ok(ctx.accounts.owner_share_account.amount)
}
