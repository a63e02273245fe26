//! Instruction handlers for the Reward Ledger program.
//!
//! This module contains all instruction implementations.

pub mod admin;
pub mod deposit;
pub mod harvest;
pub mod initialize;
pub mod pending_reward;
pub mod withdraw;

pub use admin::*;
pub use deposit::*;
pub use harvest::*;
pub use initialize::*;
pub use pending_reward::*;
pub use withdraw::*;
