//! Re-entrancy lock for mutating instructions.
//!
//! Handlers call [`enter`] first and `StakePool::unlock` on the way out,
//! whatever the result. The lock is written to account data immediately so a
//! nested invocation that deserializes the pool sees it. If the instruction
//! fails the runtime discards the write along with everything else.

use anchor_lang::prelude::*;

use crate::state::StakePool;

pub fn enter(stake_pool: &mut Account<'_, StakePool>) -> Result<()> {
    stake_pool.lock()?;
    stake_pool.exit(&crate::ID)
}
