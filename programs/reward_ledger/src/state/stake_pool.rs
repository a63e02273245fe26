use anchor_lang::prelude::*;

use crate::error::StakingError;
use crate::rewards::{reward_per_share_delta, RewardIndex};

#[account]
#[derive(Default, Debug)]
pub struct StakePool {
    pub authority: Pubkey,
    pub staking_mint: Pubkey,
    pub staking_vault: Pubkey,
    pub reward_mint: Pubkey,
    pub staker_registry: Pubkey,

    /// Reward units minted per slot, split across all stakers.
    pub reward_rate: u128,
    pub total_staked: u64,

    /// Cumulative reward per staked unit, scaled by `REWARD_PRECISION`.
    pub reward_per_share: RewardIndex,
    pub last_settlement_slot: u64,

    pub total_rewards_minted: u128,

    /// Set while a mutating instruction is running.
    pub locked: bool,

    pub created_at: i64,

    pub vault_bump: u8,
    pub bump: u8,
}

impl StakePool {
    pub const LEN: usize = 8
        + (32 * 5)
        + 16
        + 8
        + RewardIndex::LEN
        + 8
        + 16
        + 1
        + 8
        + 2;

    /// Reward index as of `now`, without storing it.
    pub fn current_index(&self, now: u64) -> Result<RewardIndex> {
        let elapsed = now
            .checked_sub(self.last_settlement_slot)
            .ok_or(StakingError::TickRegression)?;

        let delta = reward_per_share_delta(self.reward_rate, elapsed, self.total_staked)?;

        self.reward_per_share.checked_add(delta)
    }

    /// Advances the stored index to `now`.
    ///
    /// Must run before `total_staked` or `reward_rate` changes. The slot is
    /// recorded even when nothing is staked, which voids the reward for that
    /// window.
    pub fn settle_index(&mut self, now: u64) -> Result<RewardIndex> {
        let index = self.current_index(now)?;
        self.reward_per_share = index;
        self.last_settlement_slot = now;
        Ok(index)
    }

    pub fn lock(&mut self) -> Result<()> {
        require!(!self.locked, StakingError::ReentrantCall);
        self.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}
