use anchor_lang::prelude::*;

use crate::rewards::RewardIndex;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: emitted for off-chain indexers to follow stake and reward flows
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when a pool is created.
#[event]
pub struct PoolInitialized {
    pub stake_pool: Pubkey,
    pub authority: Pubkey,
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    /// Initial reward units per slot.
    pub reward_rate: u128,
    pub slot: u64,
}

/// Emitted on every deposit.
#[event]
pub struct Deposited {
    pub owner: Pubkey,
    pub amount: u64,
    /// Owner's stake after the deposit.
    pub staked_amount: u64,
    pub total_staked: u64,
    pub reward_per_share: RewardIndex,
    pub slot: u64,
}

/// Emitted on every full withdrawal.
#[event]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub amount: u64,
    /// Rewards left to harvest after settlement.
    pub pending_rewards: u128,
    pub total_staked: u64,
    pub slot: u64,
}

/// Emitted when an owner harvests their settled rewards.
#[event]
pub struct Harvested {
    pub owner: Pubkey,
    pub amount: u64,
    pub total_rewards_claimed: u128,
    pub slot: u64,
}

/// Emitted after a bulk settlement of every registered staker.
#[event]
pub struct RewardsDistributed {
    /// Sum credited across all stakers by this settlement.
    pub total_distributed: u128,
    pub stakers: u32,
    pub reward_per_share: RewardIndex,
    pub slot: u64,
}

/// Emitted when the authority changes the reward rate.
#[event]
pub struct RewardRateChanged {
    pub old_rate: u128,
    pub new_rate: u128,
    /// Rewards crystallized at the old rate before the switch.
    pub distributed: u128,
    pub slot: u64,
}
