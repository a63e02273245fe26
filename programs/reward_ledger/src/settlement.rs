//! Settlement engine.
//!
//! Every operation advances the pool's reward index to `now` and settles the
//! affected stakes against it before touching a stake balance or the reward
//! rate, so a change never applies retroactively to elapsed slots.
//!
//! These functions only move numbers between [`StakePool`], [`StakerRegistry`]
//! and [`UserStake`]. Token transfers, mints, events and the re-entrancy lock
//! live in the instruction handlers. Input, precondition and authorization
//! checks all run before the first mutation.

use anchor_lang::prelude::*;

use crate::constants::MAX_REWARD_RATE;
use crate::error::StakingError;
use crate::state::{StakePool, StakerRegistry, UserStake};

/// Stakes `amount` for `user_stake.owner`.
///
/// `allowance` is what the owner has authorized the pool to pull. The stake
/// is settled at its pre-deposit balance, then grown, then registered if it
/// was not already.
pub fn deposit(
    pool: &mut StakePool,
    registry: &mut StakerRegistry,
    user_stake: &mut UserStake,
    amount: u64,
    allowance: u64,
    now: u64,
) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);
    require!(allowance >= amount, StakingError::InsufficientAllowance);
    if !user_stake.is_registered() {
        require!(registry.has_capacity(), StakingError::RegistryFull);
    }

    let staked_amount = user_stake
        .staked_amount
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;
    let total_staked = pool
        .total_staked
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;

    let index = pool.settle_index(now)?;
    user_stake.settle(index)?;

    user_stake.staked_amount = staked_amount;
    pool.total_staked = total_staked;
    user_stake.has_ever_staked = true;

    if !user_stake.is_registered() {
        user_stake.registry_slot = registry.push(user_stake.owner)?;
    }

    Ok(())
}

/// Withdraws the whole stake of `user_stake.owner` and returns it.
///
/// Settled rewards stay in `pending_rewards`. When the withdrawer is not the
/// last registry member, the last member moves into its slot and `moved`
/// must be that member's stake record.
pub fn withdraw(
    pool: &mut StakePool,
    registry: &mut StakerRegistry,
    user_stake: &mut UserStake,
    moved: Option<&mut UserStake>,
    now: u64,
) -> Result<u64> {
    require!(user_stake.is_active(), StakingError::NoActiveStake);
    registry.check_slot(user_stake.registry_slot, &user_stake.owner)?;

    let slot = user_stake.registry_slot;
    let moved = if slot as usize == registry.len() {
        None
    } else {
        let last_owner = registry.last().ok_or(StakingError::RegistryCorrupted)?;
        let moved = moved.ok_or(StakingError::StakerAccountsMismatch)?;
        require_keys_eq!(moved.owner, *last_owner, StakingError::StakerAccountsMismatch);
        require!(
            moved.registry_slot as usize == registry.len(),
            StakingError::RegistryCorrupted
        );
        Some(moved)
    };

    let index = pool.settle_index(now)?;
    user_stake.settle(index)?;

    let balance = user_stake.staked_amount;
    user_stake.staked_amount = 0;
    pool.total_staked = pool
        .total_staked
        .checked_sub(balance)
        .ok_or(StakingError::MathOverflow)?;

    let moved_owner = registry.swap_remove(slot)?;
    // `moved` was checked against the last member above
    if let (Some(_), Some(moved)) = (moved_owner, moved) {
        moved.registry_slot = slot;
    }
    user_stake.registry_slot = 0;

    Ok(balance)
}

/// Settles the caller and pays out their pending reward, returning the amount
/// to mint.
///
/// A single mint is a `u64`, so at most `u64::MAX` is paid per call; any
/// excess stays in `pending_rewards` for the next harvest.
pub fn harvest(pool: &mut StakePool, user_stake: &mut UserStake, now: u64) -> Result<u64> {
    let index = pool.current_index(now)?;
    let pending = user_stake.pending_reward_of(index)?;
    require!(pending > 0, StakingError::NoRewardsAvailable);
    let amount = u64::try_from(pending.min(u128::from(u64::MAX)))
        .map_err(|_| StakingError::ConversionOverflow)?;
    let paid = u128::from(amount);

    let total_rewards_claimed = user_stake
        .total_rewards_claimed
        .checked_add(paid)
        .ok_or(StakingError::MathOverflow)?;
    let total_rewards_minted = pool
        .total_rewards_minted
        .checked_add(paid)
        .ok_or(StakingError::MathOverflow)?;

    pool.settle_index(now)?;
    user_stake.settle(index)?;

    user_stake.pending_rewards = pending - paid;
    user_stake.total_rewards_claimed = total_rewards_claimed;
    pool.total_rewards_minted = total_rewards_minted;

    Ok(amount)
}

/// Settles every registered stake against one index snapshot and returns the
/// total newly credited.
///
/// `stakes` must be the registry members' records in registry order.
pub fn distribute(
    pool: &mut StakePool,
    registry: &StakerRegistry,
    stakes: &mut [UserStake],
    authority: &Pubkey,
    now: u64,
) -> Result<u128> {
    require_keys_eq!(*authority, pool.authority, StakingError::Unauthorized);
    check_registry_order(registry, stakes)?;

    settle_all(pool, stakes, now)
}

/// Crystallizes everything earned at the old rate, then switches to
/// `new_rate`. Returns the amount distributed by the settlement.
pub fn set_reward_rate(
    pool: &mut StakePool,
    registry: &StakerRegistry,
    stakes: &mut [UserStake],
    authority: &Pubkey,
    new_rate: u128,
    now: u64,
) -> Result<u128> {
    require_keys_eq!(*authority, pool.authority, StakingError::Unauthorized);
    require!(new_rate <= MAX_REWARD_RATE, StakingError::RewardRateTooHigh);
    check_registry_order(registry, stakes)?;

    let distributed = settle_all(pool, stakes, now)?;
    pool.reward_rate = new_rate;

    Ok(distributed)
}

fn check_registry_order(registry: &StakerRegistry, stakes: &[UserStake]) -> Result<()> {
    require!(
        stakes.len() == registry.len(),
        StakingError::StakerAccountsMismatch
    );

    for (position, (stake, owner)) in stakes.iter().zip(registry.stakers.iter()).enumerate() {
        require_keys_eq!(stake.owner, *owner, StakingError::StakerAccountsMismatch);
        require!(
            stake.registry_slot as usize == position + 1,
            StakingError::RegistryCorrupted
        );
    }

    Ok(())
}

fn settle_all(pool: &mut StakePool, stakes: &mut [UserStake], now: u64) -> Result<u128> {
    let index = pool.settle_index(now)?;

    stakes.iter_mut().try_fold(0u128, |total, stake| -> Result<u128> {
        let credited = stake.settle(index)?;
        total
            .checked_add(credited)
            .ok_or_else(|| StakingError::MathOverflow.into())
    })
}
