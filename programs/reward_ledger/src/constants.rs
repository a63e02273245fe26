//! Program constants for the Reward Ledger program.
//!
//! PDA seeds, the fixed-point scale used by the reward index, and the bounds
//! applied to administrative parameters.

/// Seed for deriving the stake pool PDA
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";

/// Seed for deriving user stake account PDAs
pub const USER_STAKE_SEED: &[u8] = b"user_stake";

/// Seed for deriving the pool vault PDA
pub const POOL_VAULT_SEED: &[u8] = b"pool_vault";

/// Seed for deriving the staker registry PDA
pub const STAKER_REGISTRY_SEED: &[u8] = b"staker_registry";

/// Fixed-point scale of `reward_per_share` (10^18).
///
/// Every division in the accrual math floors, so amounts below one unit of
/// precision are truncated rather than rounded.
pub const REWARD_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Ceiling for `reward_rate`, in reward units per slot (10 * 10^18).
///
/// Below 2^64, so `MAX_REWARD_RATE * u64::MAX` slots of emission fits in a
/// `u128` reward balance and the 256-bit index cannot overflow.
pub const MAX_REWARD_RATE: u128 = 10 * REWARD_PRECISION;

/// Maximum number of concurrently registered stakers.
///
/// Bulk settlement passes every registered stake account in one transaction,
/// so the registry is bounded.
pub const MAX_STAKERS: usize = 64;
