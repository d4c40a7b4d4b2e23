use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Wire a strategy to a vault, exactly once
///
/// The strategy state PDA owns the token account where deployed assets
/// sit, and its `vault` back-reference never changes after this call.
#[derive(Accounts)]
pub struct InitializeStrategy<'info> {
    /// Vault authority - only they can wire a strategy
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, Vault>,

    /// Asset mint
    #[account(
        address = vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub asset_mint: Account<'info, Mint>,

    /// Strategy state PDA
    #[account(
        init,
        payer = authority,
        space = STRATEGY_STATE_SIZE,
        seeds = [STRATEGY_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub strategy_state: Account<'info, StrategyState>,

    /// Strategy's token account, owned by the strategy state PDA
    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = strategy_state,
    )]
    pub strategy_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn initialize_strategy(ctx: Context<InitializeStrategy>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    require!(!vault_state.has_strategy(), VaultError::StrategyAlreadySet);

    let strategy_state = &mut ctx.accounts.strategy_state;
    strategy_state.vault = vault_state.key();
    strategy_state.token_account = ctx.accounts.strategy_token_account.key();
    strategy_state.managed_assets = 0;
    strategy_state.bump = ctx.bumps.strategy_state;
    strategy_state._reserved = [0; 32];

    vault_state.strategy = strategy_state.key();

    emit!(StrategyInitialized {
        vault: vault_state.key(),
        strategy: strategy_state.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Move idle assets into or out of the strategy
///
/// Neither direction mints or burns shares; only where the backing sits
/// changes, so price-per-share is untouched.
#[derive(Accounts)]
pub struct MoveStrategyFunds<'info> {
    /// Vault authority - only they can move funds
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, Vault>,

    /// CHECK: PDA used as transfer authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account
    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Strategy state PDA, must be the one wired to this vault
    #[account(
        mut,
        address = vault_state.strategy @ VaultError::InvalidStrategy,
    )]
    pub strategy_state: Account<'info, StrategyState>,

    /// Strategy's token account
    #[account(
        mut,
        address = strategy_state.token_account @ VaultError::InvalidStrategy,
    )]
    pub strategy_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn deploy_to_strategy(ctx: Context<MoveStrategyFunds>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);

    let idle = ctx.accounts.vault_token_account.amount;
    require!(amount <= idle, VaultError::InsufficientIdleLiquidity);

    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_token_account.to_account_info(),
            to: ctx.accounts.strategy_token_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    let strategy_state = &mut ctx.accounts.strategy_state;
    strategy_state.managed_assets = strategy_state
        .managed_assets
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    emit!(StrategyDeployed {
        vault: ctx.accounts.vault_state.key(),
        strategy: strategy_state.key(),
        amount,
        managed_assets: strategy_state.managed_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Ask the strategy to return assets to idle custody. The vault-side
/// balance delta must equal the requested amount exactly; a strategy that
/// under-delivers fails hard instead of being silently truncated.
pub fn withdraw_from_strategy(ctx: Context<MoveStrategyFunds>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);

    let idle_before = ctx.accounts.vault_token_account.amount;

    let vault_key = ctx.accounts.vault_state.key();
    let strategy_bump = ctx.accounts.strategy_state.bump;
    let strategy_seeds: &[&[u8]] = &[STRATEGY_SEED, vault_key.as_ref(), &[strategy_bump]];
    let signer_seeds = &[&strategy_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.strategy_token_account.to_account_info(),
            to: ctx.accounts.vault_token_account.to_account_info(),
            authority: ctx.accounts.strategy_state.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    ctx.accounts.vault_token_account.reload()?;
    let delivered = ctx
        .accounts
        .vault_token_account
        .amount
        .checked_sub(idle_before)
        .ok_or(VaultError::MathOverflow)?;
    require!(delivered == amount, VaultError::InsufficientStrategyLiquidity);

    let strategy_state = &mut ctx.accounts.strategy_state;
    strategy_state.managed_assets = strategy_state
        .managed_assets
        .checked_sub(amount)
        .ok_or(VaultError::InsufficientStrategyLiquidity)?;

    emit!(StrategyWithdrawn {
        vault: vault_key,
        strategy: strategy_state.key(),
        amount,
        managed_assets: strategy_state.managed_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Adjust the strategy's self-reported total
///
/// Stands in for real yield and loss events. Because every conversion
/// folds `managed_assets` into the pool size, a report immediately moves
/// price-per-share for all holders proportionally.
#[derive(Accounts)]
pub struct ReportStrategy<'info> {
    /// Vault authority
    pub authority: Signer<'info>,

    /// Vault state PDA
    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, Vault>,

    /// Strategy state PDA, must be the one wired to this vault
    #[account(
        mut,
        address = vault_state.strategy @ VaultError::InvalidStrategy,
    )]
    pub strategy_state: Account<'info, StrategyState>,
}

pub fn report_gain(ctx: Context<ReportStrategy>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);

    let strategy_state = &mut ctx.accounts.strategy_state;
    strategy_state.managed_assets = strategy_state
        .managed_assets
        .checked_add(amount)
        .ok_or(VaultError::MathOverflow)?;

    emit!(StrategyReported {
        vault: ctx.accounts.vault_state.key(),
        strategy: strategy_state.key(),
        gain: true,
        amount,
        managed_assets: strategy_state.managed_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn report_loss(ctx: Context<ReportStrategy>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);

    let strategy_state = &mut ctx.accounts.strategy_state;
    strategy_state.managed_assets = strategy_state
        .managed_assets
        .checked_sub(amount)
        .ok_or(VaultError::MathOverflow)?;

    emit!(StrategyReported {
        vault: ctx.accounts.vault_state.key(),
        strategy: strategy_state.key(),
        gain: false,
        amount,
        managed_assets: strategy_state.managed_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Cover a payout shortfall by unwinding strategy funds into idle custody.
///
/// Called by withdraw/redeem between the burn and the outbound transfer.
/// No-op when idle liquidity already covers the payout. The vault-side
/// delta must equal the shortfall exactly, and the strategy's reported
/// total must actually carry it; both failures are hard aborts.
pub fn cover_shortfall<'info>(
    vault_state: &Account<'info, Vault>,
    vault_token_account: &mut Account<'info, TokenAccount>,
    strategy_state: &mut Option<Account<'info, StrategyState>>,
    strategy_token_account: &Option<Account<'info, TokenAccount>>,
    token_program: &Program<'info, Token>,
    required: u64,
) -> Result<u64> {
    let idle = vault_token_account.amount;
    if idle >= required {
        return Ok(0);
    }
    let shortfall = required - idle;

    let strategy = strategy_state
        .as_mut()
        .ok_or(VaultError::StrategyNotSet)?;
    let strategy_token = strategy_token_account
        .as_ref()
        .ok_or(VaultError::StrategyNotSet)?;
    require_keys_eq!(
        strategy_token.key(),
        strategy.token_account,
        VaultError::InvalidStrategy
    );

    let vault_key = vault_state.key();
    let strategy_seeds: &[&[u8]] = &[STRATEGY_SEED, vault_key.as_ref(), &[strategy.bump]];
    let signer_seeds = &[&strategy_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        Transfer {
            from: strategy_token.to_account_info(),
            to: vault_token_account.to_account_info(),
            authority: strategy.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, shortfall)?;

    vault_token_account.reload()?;
    let delivered = vault_token_account
        .amount
        .checked_sub(idle)
        .ok_or(VaultError::MathOverflow)?;
    require!(
        delivered == shortfall,
        VaultError::InsufficientStrategyLiquidity
    );

    strategy.managed_assets = strategy
        .managed_assets
        .checked_sub(shortfall)
        .ok_or(VaultError::InsufficientStrategyLiquidity)?;

    emit!(StrategyShortfallCovered {
        vault: vault_key,
        strategy: strategy.key(),
        shortfall,
        managed_assets: strategy.managed_assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(shortfall)
}
