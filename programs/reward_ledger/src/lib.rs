//! # Reward Ledger Program
//!
//! A single-pool staking program: users stake one SPL token and accrue a
//! second, minted reward token in proportion to their share of the pool and
//! the slots elapsed.
//!
//! ## Accounting
//! - A global reward-per-share index, scaled by 10^18, grows by
//!   `reward_rate * elapsed_slots / total_staked` on every settlement
//! - Each stake records the index at its last settlement, so its accrual is
//!   computed lazily with no per-slot iteration
//! - While nothing is staked the index is frozen and that slot window's
//!   reward is never minted
//! - A registry of active stakers (swap-remove, O(1)) allows the authority to
//!   settle everyone against one index snapshot
//!
//! ## Features
//! - Deposit via SPL delegation (approve the pool PDA, then deposit)
//! - Full withdrawal; settled rewards remain harvestable
//! - Harvest mints rewards from the pool-controlled reward mint
//! - Admin bulk distribution and reward-rate changes with prior settlement
//! - Re-entrancy lock on every mutating instruction

use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod constants;
pub mod error;
pub mod events;
mod guard;
pub mod instructions;
pub mod rewards;
pub mod settlement;
pub mod state;

use instructions::*;

#[program]
pub mod reward_ledger {
    use super::*;

    /// Initializes the pool, its stake vault and its staker registry.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `reward_rate` - Reward units minted per slot, shared by all stakers
    ///
    /// # Errors
    /// Returns an error if:
    /// - The rate exceeds MAX_REWARD_RATE
    /// - The pool PDA is not the reward mint's mint authority
    pub fn initialize(ctx: Context<Initialize>, reward_rate: u128) -> Result<()> {
        instructions::initialize::handler(ctx, reward_rate)
    }

    /// Stakes tokens the user has delegated to the pool.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for depositing
    /// * `amount` - Amount of tokens to stake
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - The delegated allowance is below `amount`
    /// - The staker registry is full
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraws the user's whole stake.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for withdrawing;
    ///   the last registry member's stake as first remaining account when the
    ///   user is not that member
    ///
    /// # Errors
    /// Returns an error if:
    /// - The user has nothing staked
    /// - The moved registry member's stake account is missing or wrong
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler(ctx)
    }

    /// Mints the user's settled rewards, at most `u64::MAX` per call.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for harvesting
    ///
    /// # Errors
    /// Returns an error if no rewards are available.
    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        instructions::harvest::handler(ctx)
    }

    /// Admin function settling every registered staker at once.
    ///
    /// # Arguments
    /// * `ctx` - Admin accounts; every registry member's stake as remaining
    ///   accounts, in registry order
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the authority
    /// - The remaining accounts do not match the registry
    pub fn distribute(ctx: Context<AdminControl>) -> Result<u128> {
        instructions::admin::distribute_handler(ctx)
    }

    /// Admin function changing the reward rate.
    ///
    /// Performs a full distribution at the old rate first.
    ///
    /// # Arguments
    /// * `ctx` - Same accounts as `distribute`
    /// * `new_rate` - New reward units per slot
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the authority
    /// - The rate exceeds MAX_REWARD_RATE
    /// - The remaining accounts do not match the registry
    pub fn set_reward_rate(ctx: Context<AdminControl>, new_rate: u128) -> Result<u128> {
        instructions::admin::set_reward_rate_handler(ctx, new_rate)
    }

    /// Returns the rewards a stake could harvest at the current slot.
    pub fn pending_reward(ctx: Context<PendingReward>) -> Result<u128> {
        instructions::pending_reward::handler(ctx)
    }
}
