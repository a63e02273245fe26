//! Fixed-point reward-per-share math.
//!
//! The pool keeps one accumulator, `reward_per_share`, scaled by
//! [`REWARD_PRECISION`]. A staker's reward since their last settlement is
//! their stake times the accumulator growth since then, so nothing has to
//! iterate stakers per slot:
//!
//! ```text
//! Δindex  = reward_rate × elapsed_slots × PRECISION / total_staked
//! accrued = stake × (index − index_paid) / PRECISION
//! ```
//!
//! Both divisions floor. Test expectations depend on that exact rounding.
//!
//! The accumulator is 256 bits wide. With `reward_rate <= MAX_REWARD_RATE`
//! (below 2^64) and at most `u64::MAX` slots, it stays below 2^188, and any
//! single stake's accrual stays below `MAX_REWARD_RATE * u64::MAX`, which
//! fits in a `u128`.

use std::cmp::Ordering;
use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::REWARD_PRECISION;
use crate::error::StakingError;

pub use wide::U256;

mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer for index arithmetic.
        pub struct U256(4);
    }
}

/// Stored form of a reward-per-share value: little-endian 64-bit limbs.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct RewardIndex {
    pub limbs: [u64; 4],
}

impl RewardIndex {
    pub const LEN: usize = 32;

    pub fn value(&self) -> U256 {
        U256(self.limbs)
    }

    /// Advances the index by `delta`.
    pub fn checked_add(self, delta: U256) -> Result<Self> {
        let next = self
            .value()
            .checked_add(delta)
            .ok_or(StakingError::MathOverflow)?;
        Ok(next.into())
    }
}

impl From<U256> for RewardIndex {
    fn from(value: U256) -> Self {
        Self { limbs: value.0 }
    }
}

impl From<u128> for RewardIndex {
    fn from(value: u128) -> Self {
        U256::from(value).into()
    }
}

impl PartialOrd for RewardIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RewardIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

impl fmt::Display for RewardIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Growth of the reward index over `elapsed` slots.
///
/// Returns zero when nothing is staked: reward emitted into an empty pool is
/// not recorded anywhere.
pub fn reward_per_share_delta(reward_rate: u128, elapsed: u64, total_staked: u64) -> Result<U256> {
    if total_staked == 0 || elapsed == 0 {
        return Ok(U256::zero());
    }

    let delta = U256::from(reward_rate)
        .checked_mul(U256::from(elapsed))
        .ok_or(StakingError::MathOverflow)?
        .checked_mul(U256::from(REWARD_PRECISION))
        .ok_or(StakingError::MathOverflow)?
        / U256::from(total_staked);

    Ok(delta)
}

/// Reward earned by `stake` between index snapshots `paid` and `index`.
pub fn accrued_since(stake: u64, index: RewardIndex, paid: RewardIndex) -> Result<u128> {
    let growth = index
        .value()
        .checked_sub(paid.value())
        .ok_or(StakingError::MathOverflow)?;

    let accrued = U256::from(stake)
        .checked_mul(growth)
        .ok_or(StakingError::MathOverflow)?
        / U256::from(REWARD_PRECISION);

    require!(
        accrued <= U256::from(u128::MAX),
        StakingError::MathOverflow
    );
    Ok(accrued.low_u128())
}
