/// Admin instruction handlers.
///
/// Bulk distribution and reward-rate changes. Both settle every registered
/// staker, so every registry member's `UserStake` must be passed as a
/// writable remaining account, in registry order.
///
/// ## Security Guarantees
/// - All admin functions require signer == pool.authority
/// - PDA validation ensures correct pool and registry
/// - Remaining accounts are checked for ownership, PDA address and order

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{RewardRateChanged, RewardsDistributed};
use crate::guard;
use crate::settlement;
use crate::state::{StakePool, StakerRegistry, UserStake};

/// Accounts required for admin operations.
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// The pool authority.
    /// SECURITY: Must be signer AND match pool.authority.
    #[account(
        mut,
        constraint = authority.key() == stake_pool.authority @ StakingError::Unauthorized
    )]
    pub authority: Signer<'info>,

    /// The stake pool to settle.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = authority @ StakingError::Unauthorized,
        has_one = staker_registry
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// The pool's staker registry, read to order the settlement.
    #[account(
        seeds = [STAKER_REGISTRY_SEED, stake_pool.key().as_ref()],
        bump = staker_registry.bump
    )]
    pub staker_registry: Account<'info, StakerRegistry>,
}

/// Settle every registered staker against a single index snapshot.
///
/// # Arguments
/// * `ctx` - AdminControl accounts context, registry stakes as remaining accounts
///
/// # Returns
/// Total rewards credited across all stakers
pub fn distribute_handler(mut ctx: Context<AdminControl>) -> Result<u128> {
    guard::enter(&mut ctx.accounts.stake_pool)?;
    let result = distribute(&mut ctx);
    ctx.accounts.stake_pool.unlock();
    result
}

fn distribute(ctx: &mut Context<AdminControl>) -> Result<u128> {
    let clock = Clock::get()?;
    let stake_pool_key = ctx.accounts.stake_pool.key();
    let mut stakes = load_stakes(ctx.remaining_accounts, &stake_pool_key)?;

    let total = settlement::distribute(
        &mut ctx.accounts.stake_pool,
        &ctx.accounts.staker_registry,
        &mut stakes,
        &ctx.accounts.authority.key(),
        clock.slot,
    )?;

    store_stakes(ctx.remaining_accounts, &stakes)?;

    msg!("Distributed {} reward units across {} stakers", total, stakes.len());
    msg!("Reward per share: {}", ctx.accounts.stake_pool.reward_per_share);

    emit_distribution(&ctx.accounts.stake_pool, total, stakes.len(), clock.slot)?;

    Ok(total)
}

/// Change the reward rate after crystallizing rewards at the old rate.
///
/// # Arguments
/// * `ctx` - AdminControl accounts context, registry stakes as remaining accounts
/// * `new_rate` - New reward units per slot, at most MAX_REWARD_RATE
///
/// # Returns
/// Rewards credited by the settlement that preceded the change
pub fn set_reward_rate_handler(mut ctx: Context<AdminControl>, new_rate: u128) -> Result<u128> {
    guard::enter(&mut ctx.accounts.stake_pool)?;
    let result = set_reward_rate(&mut ctx, new_rate);
    ctx.accounts.stake_pool.unlock();
    result
}

fn set_reward_rate(ctx: &mut Context<AdminControl>, new_rate: u128) -> Result<u128> {
    let clock = Clock::get()?;
    let stake_pool_key = ctx.accounts.stake_pool.key();
    let old_rate = ctx.accounts.stake_pool.reward_rate;
    let mut stakes = load_stakes(ctx.remaining_accounts, &stake_pool_key)?;

    let distributed = settlement::set_reward_rate(
        &mut ctx.accounts.stake_pool,
        &ctx.accounts.staker_registry,
        &mut stakes,
        &ctx.accounts.authority.key(),
        new_rate,
        clock.slot,
    )?;

    store_stakes(ctx.remaining_accounts, &stakes)?;

    msg!("Reward rate changed: {} -> {} per slot", old_rate, new_rate);
    msg!("Settled {} reward units at the old rate", distributed);
    msg!("Admin: {}", ctx.accounts.authority.key());

    emit_distribution(&ctx.accounts.stake_pool, distributed, stakes.len(), clock.slot)?;
    emit!(RewardRateChanged {
        old_rate,
        new_rate,
        distributed,
        slot: clock.slot,
    });

    Ok(distributed)
}

fn load_stakes(remaining: &[AccountInfo], stake_pool: &Pubkey) -> Result<Vec<UserStake>> {
    remaining
        .iter()
        .map(|info| UserStake::load(info, stake_pool))
        .collect()
}

fn store_stakes(remaining: &[AccountInfo], stakes: &[UserStake]) -> Result<()> {
    for (info, stake) in remaining.iter().zip(stakes) {
        stake.store(info)?;
    }
    Ok(())
}

fn emit_distribution(stake_pool: &StakePool, total: u128, stakers: usize, slot: u64) -> Result<()> {
    let stakers = u32::try_from(stakers).map_err(|_| StakingError::ConversionOverflow)?;

    emit!(RewardsDistributed {
        total_distributed: total,
        stakers,
        reward_per_share: stake_pool.reward_per_share,
        slot,
    });
    Ok(())
}
