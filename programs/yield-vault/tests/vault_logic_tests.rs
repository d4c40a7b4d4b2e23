/// Logic-level tests for the Yield Vault program
///
/// These drive the same conversion and ordering rules the instruction
/// handlers use, through a small in-memory vault simulation: deposits are
/// priced by observed delta against the pre-transfer pool, shares burn
/// before assets leave, shortfalls unwind through the strategy with an
/// exact-delivery requirement. On-chain atomicity (a failed instruction
/// reverting all writes) is the runtime's job and is not re-modeled here;
/// tests assert the failure kind instead.
///
/// Full SVM integration tests would require aligning Solana SDK versions
/// between Anchor 0.32.1 and mollusk-svm 0.7.2; see the version-conflict
/// note in the program's test setup.

use anchor_lang::prelude::Pubkey;
use yield_vault::constants::*;
use yield_vault::math::{
    convert_to_assets, convert_to_shares, max_withdraw_assets, mul_div, Rounding,
};

#[derive(Debug, PartialEq)]
enum SimError {
    ZeroAmount,
    Paused,
    InsufficientShares,
    InsufficientIdleLiquidity,
    StrategyShortfall,
}

struct SimStrategy {
    /// Tokens actually sitting in strategy custody
    held: u64,
    /// Self-reported total the engine trusts
    managed: u64,
}

/// Mirrors the handler-visible state: idle token balance, share supply,
/// and the strategy's self-reported position.
struct SimVault {
    idle: u64,
    supply: u64,
    paused: bool,
    strategy: Option<SimStrategy>,
}

impl SimVault {
    fn new() -> Self {
        SimVault {
            idle: 0,
            supply: 0,
            paused: false,
            strategy: None,
        }
    }

    fn with_strategy(mut self) -> Self {
        self.strategy = Some(SimStrategy { held: 0, managed: 0 });
        self
    }

    fn pool(&self) -> u64 {
        self.idle + self.strategy.as_ref().map(|s| s.managed).unwrap_or(0)
    }

    /// `skim` models a fee-on-transfer asset: only `declared - skim` arrives.
    fn deposit(&mut self, declared: u64, skim: u64) -> Result<u64, SimError> {
        if self.paused {
            return Err(SimError::Paused);
        }
        if declared == 0 {
            return Err(SimError::ZeroAmount);
        }
        let pool_before = self.pool();
        let supply_before = self.supply;
        let received = declared - skim;
        if received == 0 {
            return Err(SimError::ZeroAmount);
        }
        let shares =
            convert_to_shares(received, pool_before, supply_before, Rounding::Floor).unwrap();
        if shares == 0 {
            return Err(SimError::ZeroAmount);
        }
        self.idle += received;
        self.supply += shares;
        Ok(shares)
    }

    fn mint(&mut self, shares: u64) -> Result<u64, SimError> {
        if self.paused {
            return Err(SimError::Paused);
        }
        if shares == 0 {
            return Err(SimError::ZeroAmount);
        }
        let assets = if self.supply == 0 {
            shares
        } else {
            mul_div(shares, self.pool(), self.supply, Rounding::Ceiling).unwrap()
        };
        if assets == 0 {
            return Err(SimError::ZeroAmount);
        }
        self.idle += assets;
        self.supply += shares;
        Ok(assets)
    }

    fn withdraw(&mut self, assets: u64, holder_shares: u64) -> Result<u64, SimError> {
        if self.paused {
            return Err(SimError::Paused);
        }
        if assets == 0 {
            return Err(SimError::ZeroAmount);
        }
        let shares = convert_to_shares(assets, self.pool(), self.supply, Rounding::Ceiling).unwrap();
        if shares == 0 {
            return Err(SimError::ZeroAmount);
        }
        if shares > holder_shares || shares > self.supply {
            return Err(SimError::InsufficientShares);
        }
        // burn first, then move assets
        self.supply -= shares;
        self.cover_shortfall(assets)?;
        self.idle -= assets;
        Ok(shares)
    }

    fn redeem(&mut self, shares: u64, holder_shares: u64) -> Result<u64, SimError> {
        if self.paused {
            return Err(SimError::Paused);
        }
        if shares == 0 {
            return Err(SimError::ZeroAmount);
        }
        if shares > holder_shares || shares > self.supply {
            return Err(SimError::InsufficientShares);
        }
        let assets = convert_to_assets(shares, self.pool(), self.supply, Rounding::Floor).unwrap();
        if assets == 0 {
            return Err(SimError::ZeroAmount);
        }
        self.supply -= shares;
        self.cover_shortfall(assets)?;
        self.idle -= assets;
        Ok(assets)
    }

    fn cover_shortfall(&mut self, required: u64) -> Result<u64, SimError> {
        if self.idle >= required {
            return Ok(0);
        }
        let shortfall = required - self.idle;
        let strat = self
            .strategy
            .as_mut()
            .ok_or(SimError::StrategyShortfall)?;
        if strat.held < shortfall || strat.managed < shortfall {
            return Err(SimError::StrategyShortfall);
        }
        strat.held -= shortfall;
        strat.managed -= shortfall;
        self.idle += shortfall;
        Ok(shortfall)
    }

    fn deploy(&mut self, amount: u64) -> Result<(), SimError> {
        if amount > self.idle {
            return Err(SimError::InsufficientIdleLiquidity);
        }
        self.idle -= amount;
        let strat = self.strategy.as_mut().unwrap();
        strat.held += amount;
        strat.managed += amount;
        Ok(())
    }

    /// A real loss: tokens are gone and the strategy reports it.
    fn report_loss(&mut self, amount: u64) {
        let strat = self.strategy.as_mut().unwrap();
        strat.held -= amount;
        strat.managed -= amount;
    }
}

// =============================================================================
// Conversion flow properties
// =============================================================================

#[test]
fn test_bootstrap_first_deposit_one_to_one() {
    let mut vault = SimVault::new();
    let shares = vault.deposit(1000, 0).unwrap();
    assert_eq!(shares, 1000, "first deposit mints 1:1");
    assert_eq!(vault.supply, 1000);
    assert_eq!(vault.pool(), 1000);
}

#[test]
fn test_proportional_deposit() {
    let mut vault = SimVault::new();
    vault.deposit(100, 0).unwrap();
    // pool 100, supply 100, deposit 50 -> floor(50 * 100 / 100) = 50
    let shares = vault.deposit(50, 0).unwrap();
    assert_eq!(shares, 50);
    assert_eq!(vault.supply, 150);
    assert_eq!(vault.pool(), 150);
}

#[test]
fn test_fee_skimming_asset_earns_only_delta() {
    let mut vault = SimVault::new();
    // declared 100 but only 90 arrives: shares are priced on 90
    let shares = vault.deposit(100, 10).unwrap();
    assert_eq!(shares, 90);
    assert_eq!(vault.pool(), 90);
}

#[test]
fn test_donation_raises_price_per_share_without_minting() {
    let mut vault = SimVault::new();
    vault.deposit(100, 0).unwrap();

    // forced transfer into vault custody, bypassing deposit
    vault.idle += 100;

    assert_eq!(vault.supply, 100, "donation must not mint");
    assert_eq!(vault.pool(), 200);
    assert_eq!(
        convert_to_assets(100, vault.pool(), vault.supply, Rounding::Floor).unwrap(),
        200,
        "every existing share now claims twice as much"
    );
}

#[test]
fn test_mint_charges_ceiling_assets() {
    let mut vault = SimVault::new();
    vault.deposit(100, 0).unwrap();
    vault.idle += 100; // pool 200, supply 100

    // mint 50 shares: ceil(50 * 200 / 100) = 100 assets
    let assets = vault.mint(50).unwrap();
    assert_eq!(assets, 100);
    assert_eq!(vault.supply, 150);
    assert_eq!(vault.pool(), 300);
}

#[test]
fn test_mint_bootstrap_is_one_to_one() {
    let mut vault = SimVault::new();
    let assets = vault.mint(750).unwrap();
    assert_eq!(assets, 750);
}

#[test]
fn test_rounding_favors_vault_at_pool_4_supply_3() {
    // redeem 1 share -> floor(1 * 4 / 3) = 1 asset
    let mut vault = SimVault {
        idle: 4,
        supply: 3,
        paused: false,
        strategy: None,
    };
    assert_eq!(vault.redeem(1, 3).unwrap(), 1);

    // withdraw 1 asset -> ceil(1 * 3 / 4) = 1 share, never less
    let mut vault = SimVault {
        idle: 4,
        supply: 3,
        paused: false,
        strategy: None,
    };
    assert_eq!(vault.withdraw(1, 3).unwrap(), 1);
}

#[test]
fn test_dust_deposit_rejected_instead_of_minting_nothing() {
    // price per share is 100: a 50-asset deposit rounds to zero shares
    let mut vault = SimVault {
        idle: 1000,
        supply: 10,
        paused: false,
        strategy: None,
    };
    assert_eq!(vault.deposit(50, 0), Err(SimError::ZeroAmount));
    assert_eq!(vault.pool(), 1000, "failed deposit must not change state");
    assert_eq!(vault.supply, 10);
}

#[test]
fn test_preview_matches_execution() {
    let mut vault = SimVault::new();
    vault.deposit(1000, 0).unwrap();
    vault.idle += 127; // awkward ratio: pool 1127, supply 1000

    let previewed =
        convert_to_shares(50, vault.pool(), vault.supply, Rounding::Floor).unwrap();
    let minted = vault.deposit(50, 0).unwrap();
    assert_eq!(previewed, minted);

    let previewed =
        convert_to_shares(100, vault.pool(), vault.supply, Rounding::Ceiling).unwrap();
    let burned = vault.withdraw(100, vault.supply).unwrap();
    assert_eq!(previewed, burned);
}

#[test]
fn test_no_inflation_across_operation_sequence() {
    let mut vault = SimVault::new();

    assert_eq!(vault.deposit(1000, 0).unwrap(), 1000);
    assert!(vault.supply <= vault.pool());

    // fee-skimming deposit: 90 arrives at ratio 1:1
    assert_eq!(vault.deposit(100, 10).unwrap(), 90);
    assert!(vault.supply <= vault.pool());

    // donation
    vault.idle += 37;
    assert!(vault.supply <= vault.pool());

    // pool 1127, supply 1090: floor(50 * 1090 / 1127) = 48
    assert_eq!(vault.deposit(50, 0).unwrap(), 48);
    assert!(vault.supply <= vault.pool());

    // pool 1177, supply 1138: ceil(100 * 1138 / 1177) = 97
    assert_eq!(vault.withdraw(100, vault.supply).unwrap(), 97);
    assert!(vault.supply <= vault.pool());

    // pool 1077, supply 1041: floor(41 * 1077 / 1041) = 42
    assert_eq!(vault.redeem(41, vault.supply).unwrap(), 42);
    assert!(vault.supply <= vault.pool());
}

#[test]
fn test_max_withdraw_is_always_payable() {
    let mut vault = SimVault::new();
    vault.deposit(1000, 0).unwrap();
    vault.idle += 127; // pool 1127, supply 1000
    vault.deposit(50, 0).unwrap(); // second holder

    let holder_shares = 90u64;
    let max = max_withdraw_assets(holder_shares, vault.pool(), vault.supply).unwrap();
    let burned = vault.withdraw(max, holder_shares).unwrap();
    assert!(burned <= holder_shares);
}

// =============================================================================
// Strategy properties
// =============================================================================

#[test]
fn test_deploy_moves_backing_not_shares() {
    let mut vault = SimVault::new().with_strategy();
    vault.deposit(1000, 0).unwrap();

    let pool_before = vault.pool();
    let supply_before = vault.supply;
    vault.deploy(600).unwrap();

    assert_eq!(vault.idle, 400);
    assert_eq!(vault.strategy.as_ref().unwrap().managed, 600);
    assert_eq!(vault.pool(), pool_before, "pool size unchanged by deploy");
    assert_eq!(vault.supply, supply_before, "no shares move on deploy");
}

#[test]
fn test_deploy_cannot_exceed_idle() {
    let mut vault = SimVault::new().with_strategy();
    vault.deposit(100, 0).unwrap();
    assert_eq!(vault.deploy(101), Err(SimError::InsufficientIdleLiquidity));
}

#[test]
fn test_withdrawal_unwinds_strategy_shortfall() {
    let mut vault = SimVault::new().with_strategy();
    vault.deposit(1000, 0).unwrap();
    vault.deploy(900).unwrap(); // idle 100

    // withdrawing 400 needs a 300-unit unwind
    let burned = vault.withdraw(400, 1000).unwrap();
    assert_eq!(burned, 400);
    assert_eq!(vault.idle, 0);
    assert_eq!(vault.strategy.as_ref().unwrap().managed, 600);
    // solvency: pool == idle + managed
    assert_eq!(vault.pool(), 600);
    assert_eq!(vault.supply, 600);
}

#[test]
fn test_strategy_under_delivery_is_a_hard_failure() {
    // strategy reported a 100-unit position but actually holds 60
    let mut vault = SimVault {
        idle: 0,
        supply: 100,
        paused: false,
        strategy: Some(SimStrategy {
            held: 60,
            managed: 100,
        }),
    };
    assert_eq!(vault.withdraw(80, 100), Err(SimError::StrategyShortfall));
}

#[test]
fn test_loss_socialized_proportionally_through_ratio() {
    let mut vault = SimVault::new().with_strategy();
    let holder_a = vault.deposit(100, 0).unwrap();
    let holder_b = vault.deposit(100, 0).unwrap();
    assert_eq!(holder_a, 100);
    assert_eq!(holder_b, 100);

    vault.deploy(200).unwrap(); // everything delegated
    vault.report_loss(40);

    // each holder's redeemable value drops 100 -> 80, no per-holder pass
    assert_eq!(
        convert_to_assets(holder_a, vault.pool(), vault.supply, Rounding::Floor).unwrap(),
        80
    );

    let paid_a = vault.redeem(holder_a, holder_a).unwrap();
    assert_eq!(paid_a, 80);
    let paid_b = vault.redeem(holder_b, holder_b).unwrap();
    assert_eq!(paid_b, 80);
    assert_eq!(vault.supply, 0);
    assert_eq!(vault.pool(), 0);
}

#[test]
fn test_gain_raises_every_holder_claim() {
    let mut vault = SimVault::new().with_strategy();
    vault.deposit(100, 0).unwrap();
    vault.deploy(100).unwrap();

    // self-reported gain folds straight into the conversion denominator
    vault.strategy.as_mut().unwrap().managed += 50;
    vault.strategy.as_mut().unwrap().held += 50;

    assert_eq!(
        convert_to_assets(100, vault.pool(), vault.supply, Rounding::Floor).unwrap(),
        150
    );
    // and a late depositor pays the higher price: floor(150 * 100 / 150) = 100
    assert_eq!(vault.deposit(150, 0).unwrap(), 100);
}

// =============================================================================
// Gating properties
// =============================================================================

#[test]
fn test_paused_blocks_entries_but_not_previews() {
    let mut vault = SimVault::new();
    vault.deposit(1000, 0).unwrap();
    vault.paused = true;

    assert_eq!(vault.deposit(100, 0), Err(SimError::Paused));
    assert_eq!(vault.mint(100), Err(SimError::Paused));
    assert_eq!(vault.withdraw(100, 1000), Err(SimError::Paused));
    assert_eq!(vault.redeem(100, 1000), Err(SimError::Paused));
    assert_eq!(vault.pool(), 1000, "pausing never moves balances");
    assert_eq!(vault.supply, 1000);

    // previews keep answering from live state
    assert_eq!(
        convert_to_shares(100, vault.pool(), vault.supply, Rounding::Floor).unwrap(),
        100
    );

    vault.paused = false;
    assert_eq!(vault.deposit(100, 0).unwrap(), 100);
}

#[test]
fn test_zero_amount_always_rejected() {
    let mut empty = SimVault::new();
    assert_eq!(empty.deposit(0, 0), Err(SimError::ZeroAmount));
    assert_eq!(empty.mint(0), Err(SimError::ZeroAmount));
    assert_eq!(empty.withdraw(0, 0), Err(SimError::ZeroAmount));
    assert_eq!(empty.redeem(0, 0), Err(SimError::ZeroAmount));

    let mut funded = SimVault::new();
    funded.deposit(1000, 0).unwrap();
    assert_eq!(funded.deposit(0, 0), Err(SimError::ZeroAmount));
    assert_eq!(funded.withdraw(0, 1000), Err(SimError::ZeroAmount));
    assert_eq!(funded.pool(), 1000);
    assert_eq!(funded.supply, 1000);
}

// =============================================================================
// PDA derivation
// =============================================================================

#[test]
fn test_pda_uniqueness_per_asset_mint() {
    let program_id = yield_vault::id();
    let asset_mint_1 = Pubkey::new_unique();
    let asset_mint_2 = Pubkey::new_unique();

    let (vault_1, _) =
        Pubkey::find_program_address(&[VAULT_SEED, asset_mint_1.as_ref()], &program_id);
    let (vault_2, _) =
        Pubkey::find_program_address(&[VAULT_SEED, asset_mint_2.as_ref()], &program_id);
    assert_ne!(vault_1, vault_2);

    let (shares_1, _) =
        Pubkey::find_program_address(&[SHARE_MINT_SEED, asset_mint_1.as_ref()], &program_id);
    let (shares_2, _) =
        Pubkey::find_program_address(&[SHARE_MINT_SEED, asset_mint_2.as_ref()], &program_id);
    assert_ne!(shares_1, shares_2);
}

#[test]
fn test_pda_uniqueness_across_seed_kinds() {
    let program_id = yield_vault::id();
    let asset_mint = Pubkey::new_unique();

    let (vault_state, _) =
        Pubkey::find_program_address(&[VAULT_SEED, asset_mint.as_ref()], &program_id);
    let (share_mint, _) =
        Pubkey::find_program_address(&[SHARE_MINT_SEED, asset_mint.as_ref()], &program_id);
    let (vault_authority, _) =
        Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED, asset_mint.as_ref()], &program_id);
    let (strategy, _) =
        Pubkey::find_program_address(&[STRATEGY_SEED, vault_state.as_ref()], &program_id);

    assert_ne!(vault_state, share_mint);
    assert_ne!(vault_state, vault_authority);
    assert_ne!(share_mint, vault_authority);
    assert_ne!(strategy, vault_state);
}
