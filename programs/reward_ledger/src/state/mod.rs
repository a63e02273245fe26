//! State structures for the Reward Ledger program.
//!
//! This module defines all account structures used to store program state.

pub mod stake_pool;
pub mod staker_registry;
pub mod user_stake;

pub use stake_pool::*;
pub use staker_registry::*;
pub use user_stake::*;
