use anchor_lang::prelude::*;

use crate::constants::USER_STAKE_SEED;
use crate::error::StakingError;
use crate::rewards::{accrued_since, RewardIndex};

#[account]
#[derive(Default, Debug)]
pub struct UserStake {
    pub owner: Pubkey,
    pub stake_pool: Pubkey,

    pub staked_amount: u64,

    /// Pool `reward_per_share` at this stake's last settlement.
    pub reward_per_share_paid: RewardIndex,
    /// Settled, not yet harvested.
    pub pending_rewards: u128,
    pub total_rewards_claimed: u128,

    /// 1-based position in the staker registry, 0 when not registered.
    pub registry_slot: u32,
    pub has_ever_staked: bool,
    pub bump: u8,
}

impl UserStake {
    pub const LEN: usize = 8 + 32 + 32 + 8 + RewardIndex::LEN + 16 + 16 + 4 + 1 + 1;

    pub fn is_active(&self) -> bool {
        self.staked_amount > 0
    }

    pub fn is_registered(&self) -> bool {
        self.registry_slot != 0
    }

    /// Settled rewards plus whatever the current stake earned up to `index`.
    pub fn pending_reward_of(&self, index: RewardIndex) -> Result<u128> {
        let accrued = accrued_since(self.staked_amount, index, self.reward_per_share_paid)?;

        self.pending_rewards
            .checked_add(accrued)
            .ok_or_else(|| StakingError::MathOverflow.into())
    }

    /// Folds rewards earned up to `index` into `pending_rewards` and rebases
    /// the snapshot. Returns the amount newly credited.
    ///
    /// A fresh record (no stake, snapshot 0) is credited nothing and simply
    /// rebased, so it never collects reward from before it joined.
    pub fn settle(&mut self, index: RewardIndex) -> Result<u128> {
        let pending = self.pending_reward_of(index)?;
        let credited = pending - self.pending_rewards;

        self.pending_rewards = pending;
        self.reward_per_share_paid = index;

        Ok(credited)
    }

    /// Loads a user stake passed outside the typed accounts struct.
    pub fn load(info: &AccountInfo, stake_pool: &Pubkey) -> Result<UserStake> {
        require_keys_eq!(*info.owner, crate::ID, StakingError::InvalidStakeAccount);
        require!(info.is_writable, StakingError::InvalidStakeAccount);

        let user_stake = {
            let data = info.try_borrow_data()?;
            UserStake::try_deserialize(&mut &data[..])?
        };

        require_keys_eq!(user_stake.stake_pool, *stake_pool, StakingError::StakePoolMismatch);

        let expected = Pubkey::create_program_address(
            &[
                USER_STAKE_SEED,
                stake_pool.as_ref(),
                user_stake.owner.as_ref(),
                &[user_stake.bump],
            ],
            &crate::ID,
        )
        .map_err(|_| StakingError::InvalidStakeAccount)?;
        require_keys_eq!(expected, *info.key, StakingError::InvalidStakeAccount);

        Ok(user_stake)
    }

    /// Writes back a user stake obtained through [`UserStake::load`].
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data;
        self.try_serialize(&mut writer)
    }
}
