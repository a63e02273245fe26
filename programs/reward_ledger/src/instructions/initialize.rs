/// Initialize instruction handler.
///
/// Creates a staking pool, its stake vault and its staker registry.
///
/// ## Security Guarantees
/// - Vault and registry are PDAs bound to the stake pool
/// - Stake and reward mints are locked to pool state permanently
/// - The pool PDA must already be the reward mint's mint authority

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::PoolInitialized;
use crate::rewards::RewardIndex;
use crate::state::{StakePool, StakerRegistry};

/// Accounts required for pool initialization.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The authority allowed to distribute and change the reward rate.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The stake pool account to be created.
    /// SECURITY: PDA derived from STAKE_POOL_SEED + stake mint, one pool per token.
    #[account(
        init,
        payer = authority,
        space = StakePool::LEN,
        seeds = [STAKE_POOL_SEED, staking_mint.key().as_ref()],
        bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// Enumerable set of active stakers.
    #[account(
        init,
        payer = authority,
        space = StakerRegistry::LEN,
        seeds = [STAKER_REGISTRY_SEED, stake_pool.key().as_ref()],
        bump
    )]
    pub staker_registry: Account<'info, StakerRegistry>,

    /// The mint of the token being staked.
    pub staking_mint: Account<'info, Mint>,

    /// The mint of the reward token. The pool PDA mints rewards from it.
    pub reward_mint: Account<'info, Mint>,

    /// The vault that will hold staked tokens.
    /// SECURITY: PDA owned by the stake pool, mint fixed to staking_mint.
    #[account(
        init,
        payer = authority,
        seeds = [POOL_VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = stake_pool
    )]
    pub staking_vault: Account<'info, TokenAccount>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,

    /// Token program for token account operations.
    pub token_program: Program<'info, Token>,

    /// Rent sysvar for rent-exempt calculations.
    pub rent: Sysvar<'info, Rent>,
}

/// Initialize a new staking pool.
///
/// # Arguments
/// * `ctx` - Initialize accounts context
/// * `reward_rate` - Reward units minted per slot, shared by all stakers
///
/// # Returns
/// Result indicating success or error
pub fn handler(ctx: Context<Initialize>, reward_rate: u128) -> Result<()> {
    // === INPUT VALIDATION ===
    require!(reward_rate <= MAX_REWARD_RATE, StakingError::RewardRateTooHigh);

    let stake_pool_key = ctx.accounts.stake_pool.key();
    require!(
        ctx.accounts.reward_mint.mint_authority == COption::Some(stake_pool_key),
        StakingError::InvalidRewardMintAuthority
    );
    require!(
        ctx.accounts.staking_mint.key() != ctx.accounts.reward_mint.key(),
        StakingError::MintMismatch
    );

    let clock = Clock::get()?;

    // === STATE INITIALIZATION ===
    let registry = &mut ctx.accounts.staker_registry;
    registry.stake_pool = stake_pool_key;
    registry.stakers = Vec::new();
    registry.bump = ctx.bumps.staker_registry;

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.authority = ctx.accounts.authority.key();
    stake_pool.staking_mint = ctx.accounts.staking_mint.key();
    stake_pool.staking_vault = ctx.accounts.staking_vault.key();
    stake_pool.reward_mint = ctx.accounts.reward_mint.key();
    stake_pool.staker_registry = ctx.accounts.staker_registry.key();
    stake_pool.reward_rate = reward_rate;
    stake_pool.total_staked = 0;
    stake_pool.reward_per_share = RewardIndex::default();
    stake_pool.last_settlement_slot = clock.slot;
    stake_pool.total_rewards_minted = 0;
    stake_pool.locked = false;
    stake_pool.created_at = clock.unix_timestamp;
    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.vault_bump = ctx.bumps.staking_vault;

    msg!("Reward ledger pool initialized");
    msg!("Authority: {}", stake_pool.authority);
    msg!("Stake mint: {}, reward mint: {}", stake_pool.staking_mint, stake_pool.reward_mint);
    msg!("Reward rate: {} per slot", reward_rate);

    emit!(PoolInitialized {
        stake_pool: stake_pool_key,
        authority: stake_pool.authority,
        staking_mint: stake_pool.staking_mint,
        reward_mint: stake_pool.reward_mint,
        reward_rate,
        slot: clock.slot,
    });

    Ok(())
}
