//! Pending reward view.
//!
//! Read-only: computes what a stake could harvest at the current slot without
//! storing the settlement.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::{StakePool, UserStake};

/// Accounts required for the pending reward view.
#[derive(Accounts)]
pub struct PendingReward<'info> {
    /// The stake pool.
    #[account(
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// The stake to inspect.
    #[account(
        constraint = user_stake.stake_pool == stake_pool.key() @ StakingError::StakePoolMismatch
    )]
    pub user_stake: Account<'info, UserStake>,
}

/// Settled plus accrued rewards of `user_stake` at the current slot.
pub fn handler(ctx: Context<PendingReward>) -> Result<u128> {
    let clock = Clock::get()?;
    let index = ctx.accounts.stake_pool.current_index(clock.slot)?;
    ctx.accounts.user_stake.pending_reward_of(index)
}
