use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, events::*, state::*};

/// Initialize a new vault for a given asset token
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault authority - can pause the vault and manage the strategy
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    #[account(
        init,
        payer = authority,
        space = VAULT_SIZE,
        seeds = [VAULT_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Account<'info, Vault>,

    /// Asset token mint (the underlying token users deposit)
    pub asset_mint: Account<'info, Mint>,

    /// Share token mint PDA, minted/burned only by the vault authority PDA
    #[account(
        init,
        payer = authority,
        seeds = [SHARE_MINT_SEED, asset_mint.key().as_ref()],
        bump,
        mint::decimals = asset_mint.decimals,
        mint::authority = vault_authority,
    )]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA used as mint and transfer authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account for holding idle assets
    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;

    vault_state.authority = ctx.accounts.authority.key();
    vault_state.asset_mint = ctx.accounts.asset_mint.key();
    vault_state.share_mint = ctx.accounts.share_mint.key();
    vault_state.strategy = Pubkey::default();
    vault_state.paused = false;
    vault_state.locked = false;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.share_bump = ctx.bumps.share_mint;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 64];

    emit!(VaultInitialized {
        vault: vault_state.key(),
        authority: vault_state.authority,
        asset_mint: vault_state.asset_mint,
        share_mint: vault_state.share_mint,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
