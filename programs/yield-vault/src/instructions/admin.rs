use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Pause circuit breaker controls
///
/// Pausing gates the four entry operations and nothing else: previews,
/// conversions and capacity queries stay readable, and no balance moves.
#[derive(Accounts)]
pub struct Admin<'info> {
    /// Vault authority
    pub authority: Signer<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, Vault>,
}

pub fn pause(ctx: Context<Admin>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.paused = true;

    emit!(PauseToggled {
        vault: vault_state.key(),
        paused: true,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn unpause(ctx: Context<Admin>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.paused = false;

    emit!(PauseToggled {
        vault: vault_state.key(),
        paused: false,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
