use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, math::*, state::*};

/// Deposit assets into the vault and receive shares
///
/// Shares are priced against the pool size and supply read *before* the
/// transfer, and computed from the observed balance delta rather than the
/// declared amount, so fee-skimming assets only earn shares for what
/// actually arrived.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing assets
    #[account(mut)]
    pub user: Signer<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        constraint = !vault_state.paused @ VaultError::VaultPaused,
    )]
    pub vault_state: Account<'info, Vault>,

    /// Asset mint
    #[account(
        address = vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub asset_mint: Account<'info, Mint>,

    /// Share mint
    #[account(
        mut,
        address = vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA used as mint authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// User's asset token account (source)
    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_asset_account: Account<'info, TokenAccount>,

    /// Receiver's share token account (destination); its owner is the receiver
    #[account(
        mut,
        constraint = receiver_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub receiver_share_account: Account<'info, TokenAccount>,

    /// Vault's token account
    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Strategy state, required iff the vault has one wired
    pub strategy_state: Option<Account<'info, StrategyState>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Deposit>, assets: u64) -> Result<u64> {
    require!(assets > 0, VaultError::ZeroAmount);

    {
        let vault_state = &mut ctx.accounts.vault_state;
        require!(!vault_state.locked, VaultError::ReentrantCall);
        vault_state.locked = true;
    }

    // Snapshot pool and supply before pulling funds so the depositor does
    // not pay into their own newly-added liquidity
    let idle_before = ctx.accounts.vault_token_account.amount;
    let managed = resolve_managed_assets(
        &ctx.accounts.vault_state,
        ctx.accounts.strategy_state.as_ref(),
    )?;
    let pool_before = total_assets(idle_before, managed)?;
    let supply_before = ctx.accounts.share_mint.supply;

    // Pull assets from the user
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_asset_account.to_account_info(),
            to: ctx.accounts.vault_token_account.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, assets)?;

    // Measure, don't trust: only the observed delta earns shares
    ctx.accounts.vault_token_account.reload()?;
    let received = ctx
        .accounts
        .vault_token_account
        .amount
        .checked_sub(idle_before)
        .ok_or(VaultError::MathOverflow)?;
    require!(received > 0, VaultError::ZeroAmount);

    let shares = convert_to_shares(received, pool_before, supply_before, Rounding::Floor)?;
    require!(shares > 0, VaultError::ZeroAmount);

    // Mint shares to the receiver
    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.share_mint.to_account_info(),
            to: ctx.accounts.receiver_share_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, shares)?;

    ctx.accounts.vault_state.locked = false;

    emit!(Deposited {
        vault: ctx.accounts.vault_state.key(),
        caller: ctx.accounts.user.key(),
        receiver: ctx.accounts.receiver_share_account.owner,
        assets: received,
        shares,
        total_assets: total_assets(ctx.accounts.vault_token_account.amount, managed)?,
        total_shares: supply_before
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(shares)
}
