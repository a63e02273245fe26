//! Error types for the Reward Ledger program.
//!
//! Every failure is surfaced as a distinct variant so callers can tell an
//! input error from an authorization error from a state precondition.
//!
//! ## Error Code Groups
//! - 6000-6002: Input validation errors
//! - 6003-6007: State/precondition errors
//! - 6008: Tick errors
//! - 6009-6010: Math/overflow errors
//! - 6011-6012: Authorization and re-entrancy errors
//! - 6013-6016: Account validation errors

use anchor_lang::prelude::*;

/// Custom error codes for the Reward Ledger program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors ==========

    /// [6000] Cannot deposit a zero amount.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6001] The pool has not been approved as delegate for enough tokens.
    #[msg("Insufficient allowance: approve the stake pool as delegate for at least the deposit amount")]
    InsufficientAllowance,

    /// [6002] Reward rate exceeds MAX_REWARD_RATE.
    #[msg("Reward rate exceeds the maximum allowed value")]
    RewardRateTooHigh,

    // ========== State/Precondition Errors ==========

    /// [6003] Caller has nothing staked.
    #[msg("No active stake found for this user")]
    NoActiveStake,

    /// [6004] Nothing to harvest.
    #[msg("No rewards available to harvest")]
    NoRewardsAvailable,

    /// [6005] The staker registry is at capacity.
    #[msg("Staker registry is full")]
    RegistryFull,

    /// [6006] Supplied stake accounts do not match the registry.
    #[msg("Stake accounts do not match the staker registry")]
    StakerAccountsMismatch,

    /// [6007] Registry slot and registry contents disagree.
    #[msg("Registry slot is out of range or points at another staker")]
    RegistryCorrupted,

    // ========== Tick Errors ==========

    /// [6008] Settlement requested for a slot before the last settlement.
    #[msg("Slot is earlier than the last settlement slot")]
    TickRegression,

    // ========== Math/Overflow Errors ==========

    /// [6009] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6010] Integer conversion failed (value out of range).
    #[msg("Integer conversion failed - value out of range")]
    ConversionOverflow,

    // ========== Authorization Errors ==========

    /// [6011] Unauthorized - caller is not the pool authority.
    #[msg("Unauthorized: caller is not the pool authority")]
    Unauthorized,

    /// [6012] A mutating instruction is already in progress for this pool.
    #[msg("Re-entrant call into a mutating instruction")]
    ReentrantCall,

    // ========== Account Validation Errors ==========

    /// [6013] Token account mint does not match the pool's mint.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6014] The reward mint is not mintable by the stake pool PDA.
    #[msg("Reward mint authority must be the stake pool PDA")]
    InvalidRewardMintAuthority,

    /// [6015] Account is not a writable user stake account of this program.
    #[msg("Invalid user stake account")]
    InvalidStakeAccount,

    /// [6016] User stake account does not belong to this pool.
    #[msg("User stake account does not belong to this pool")]
    StakePoolMismatch,
}
