use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, math::*, state::*};

use super::strategy::cover_shortfall;

/// Withdraw an exact asset amount by burning however many shares that costs
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Caller - the share owner or an approved delegate
    #[account(mut)]
    pub caller: Signer<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        constraint = !vault_state.paused @ VaultError::VaultPaused,
    )]
    pub vault_state: Account<'info, Vault>,

    /// Share mint
    #[account(
        mut,
        address = vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA used as transfer authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Owner's share token account (shares are burned from here)
    #[account(
        mut,
        constraint = owner_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    /// Receiver's asset token account (destination)
    #[account(
        mut,
        constraint = receiver_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub receiver_asset_account: Account<'info, TokenAccount>,

    /// Vault's token account
    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Strategy state, required iff the vault has one wired
    #[account(mut)]
    pub strategy_state: Option<Account<'info, StrategyState>>,

    /// Strategy's token account, required when a shortfall unwind is possible
    #[account(mut)]
    pub strategy_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Verify the caller may spend `shares` from the owner's share account.
///
/// The owner spends freely; anyone else must be the account's SPL delegate
/// with enough delegated shares. Pre-checked here so the failure surfaces
/// as a specific vault error instead of a raw token-program error.
pub fn check_share_authority(
    caller: &Pubkey,
    owner_share_account: &Account<TokenAccount>,
    shares: u64,
) -> Result<()> {
    require!(
        owner_share_account.amount >= shares,
        VaultError::InsufficientShares
    );
    if owner_share_account.owner != *caller {
        let is_delegate = match &owner_share_account.delegate {
            COption::Some(delegate) => delegate == caller,
            COption::None => false,
        };
        require!(is_delegate, VaultError::InsufficientAllowance);
        require!(
            owner_share_account.delegated_amount >= shares,
            VaultError::InsufficientAllowance
        );
    }
    Ok(())
}

/// Shares are charged with ceiling rounding so the vault is never
/// undercompensated for the exact assets it pays out. Shares burn before
/// any asset moves; a reentrant call during the transfer sees the already
/// reduced supply and cannot double-spend them.
pub fn handler(ctx: Context<Withdraw>, assets: u64) -> Result<u64> {
    require!(assets > 0, VaultError::ZeroAmount);

    {
        let vault_state = &mut ctx.accounts.vault_state;
        require!(!vault_state.locked, VaultError::ReentrantCall);
        vault_state.locked = true;
    }

    let idle = ctx.accounts.vault_token_account.amount;
    let managed = resolve_managed_assets(
        &ctx.accounts.vault_state,
        ctx.accounts.strategy_state.as_ref(),
    )?;
    let pool = total_assets(idle, managed)?;
    let supply = ctx.accounts.share_mint.supply;

    let shares = convert_to_shares(assets, pool, supply, Rounding::Ceiling)?;
    require!(shares > 0, VaultError::ZeroAmount);

    check_share_authority(
        &ctx.accounts.caller.key(),
        &ctx.accounts.owner_share_account,
        shares,
    )?;

    // Burn before any asset leaves custody
    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.owner_share_account.to_account_info(),
            authority: ctx.accounts.caller.to_account_info(),
        },
    );
    token::burn(burn_ctx, shares)?;

    // Pull any shortfall back from the strategy before paying out
    cover_shortfall(
        &ctx.accounts.vault_state,
        &mut ctx.accounts.vault_token_account,
        &mut ctx.accounts.strategy_state,
        &ctx.accounts.strategy_token_account,
        &ctx.accounts.token_program,
        assets,
    )?;

    let idle_before_payout = ctx.accounts.vault_token_account.amount;

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
            to: ctx.accounts.receiver_asset_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, assets)?;

    ctx.accounts.vault_token_account.reload()?;
    let sent = idle_before_payout
        .checked_sub(ctx.accounts.vault_token_account.amount)
        .ok_or(VaultError::MathOverflow)?;
    require!(sent == assets, VaultError::TransferAmountMismatch);

    ctx.accounts.vault_state.locked = false;

    let managed_after = ctx
        .accounts
        .strategy_state
        .as_ref()
        .map(|s| s.managed_assets)
        .unwrap_or(0);

    emit!(Withdrawn {
        vault: ctx.accounts.vault_state.key(),
        caller: ctx.accounts.caller.key(),
        receiver: ctx.accounts.receiver_asset_account.owner,
        owner: ctx.accounts.owner_share_account.owner,
        assets,
        shares,
        total_assets: total_assets(ctx.accounts.vault_token_account.amount, managed_after)?,
        total_shares: supply.checked_sub(shares).ok_or(VaultError::MathOverflow)?,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(shares)
}
