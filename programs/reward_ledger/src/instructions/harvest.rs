//! Harvest instruction handler.
//!
//! Mints a user's settled rewards without touching their stake.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Harvested;
use crate::guard;
use crate::settlement;
use crate::state::{StakePool, UserStake};

/// Accounts required for harvesting.
#[derive(Accounts)]
pub struct Harvest<'info> {
    /// The user harvesting rewards.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool. Its PDA is the reward mint authority.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = reward_mint
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// User's stake account.
    #[account(
        mut,
        seeds = [USER_STAKE_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump = user_stake.bump,
        constraint = user_stake.owner == user.key() @ StakingError::Unauthorized,
        constraint = user_stake.stake_pool == stake_pool.key() @ StakingError::StakePoolMismatch
    )]
    pub user_stake: Account<'info, UserStake>,

    /// The reward token mint.
    #[account(mut)]
    pub reward_mint: Account<'info, Mint>,

    /// User's token account receiving the minted rewards.
    #[account(
        mut,
        constraint = user_reward_account.mint == reward_mint.key() @ StakingError::MintMismatch,
        constraint = user_reward_account.owner == user.key()
    )]
    pub user_reward_account: Account<'info, TokenAccount>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Harvest settled rewards, up to `u64::MAX` per call.
///
/// Fails with `NoRewardsAvailable` when nothing has accrued since the last
/// harvest.
///
/// # Arguments
/// * `ctx` - Harvest accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler(mut ctx: Context<Harvest>) -> Result<()> {
    guard::enter(&mut ctx.accounts.stake_pool)?;
    let result = harvest(&mut ctx);
    ctx.accounts.stake_pool.unlock();
    result
}

fn harvest(ctx: &mut Context<Harvest>) -> Result<()> {
    let clock = Clock::get()?;

    let amount = settlement::harvest(
        &mut ctx.accounts.stake_pool,
        &mut ctx.accounts.user_stake,
        clock.slot,
    )?;

    let staking_mint_key = ctx.accounts.stake_pool.staking_mint;
    let seeds = &[
        STAKE_POOL_SEED,
        staking_mint_key.as_ref(),
        &[ctx.accounts.stake_pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = MintTo {
        mint: ctx.accounts.reward_mint.to_account_info(),
        to: ctx.accounts.user_reward_account.to_account_info(),
        authority: ctx.accounts.stake_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::mint_to(cpi_ctx, amount)?;

    let user_stake = &ctx.accounts.user_stake;

    msg!("Harvested {} reward tokens", amount);
    msg!("Pending rewards left: {}", user_stake.pending_rewards);
    msg!("Total rewards claimed by user: {}", user_stake.total_rewards_claimed);
    msg!("Total minted by pool: {}", ctx.accounts.stake_pool.total_rewards_minted);

    emit!(Harvested {
        owner: user_stake.owner,
        amount,
        total_rewards_claimed: user_stake.total_rewards_claimed,
        slot: clock.slot,
    });

    Ok(())
}
