use anchor_lang::prelude::*;

use crate::constants::MAX_STAKERS;
use crate::error::StakingError;

/// Enumerable set of owners with a nonzero stake.
///
/// Each member's 1-based position is mirrored in its `UserStake::registry_slot`,
/// which makes removal O(1): the last member is swapped into the freed slot.
/// Order is therefore not stable across withdrawals.
#[account]
#[derive(Default, Debug)]
pub struct StakerRegistry {
    pub stake_pool: Pubkey,
    pub stakers: Vec<Pubkey>,
    pub bump: u8,
}

impl StakerRegistry {
    pub const LEN: usize = 8 + 32 + (4 + 32 * MAX_STAKERS) + 1;

    pub fn len(&self) -> usize {
        self.stakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakers.is_empty()
    }

    pub fn last(&self) -> Option<&Pubkey> {
        self.stakers.last()
    }

    pub fn has_capacity(&self) -> bool {
        self.stakers.len() < MAX_STAKERS
    }

    /// Appends `owner` and returns its 1-based slot.
    pub fn push(&mut self, owner: Pubkey) -> Result<u32> {
        require!(self.has_capacity(), StakingError::RegistryFull);

        self.stakers.push(owner);
        u32::try_from(self.stakers.len()).map_err(|_| StakingError::ConversionOverflow.into())
    }

    /// Checks that `slot` holds `owner`.
    pub fn check_slot(&self, slot: u32, owner: &Pubkey) -> Result<()> {
        let position = (slot as usize)
            .checked_sub(1)
            .ok_or(StakingError::RegistryCorrupted)?;

        require!(
            self.stakers.get(position) == Some(owner),
            StakingError::RegistryCorrupted
        );
        Ok(())
    }

    /// Removes the member at `slot` by moving the last member into it.
    ///
    /// Returns the owner that moved, if any; its stake record must be
    /// updated to `slot` by the caller.
    pub fn swap_remove(&mut self, slot: u32) -> Result<Option<Pubkey>> {
        let position = (slot as usize)
            .checked_sub(1)
            .filter(|position| *position < self.stakers.len())
            .ok_or(StakingError::RegistryCorrupted)?;

        let last = self.stakers.len() - 1;
        self.stakers.swap_remove(position);

        if position == last {
            Ok(None)
        } else {
            Ok(Some(self.stakers[position]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_of(n: usize) -> (StakerRegistry, Vec<Pubkey>) {
        let keys: Vec<Pubkey> = (0..n).map(|_| Pubkey::new_unique()).collect();
        let mut registry = StakerRegistry::default();
        for key in &keys {
            registry.push(*key).unwrap();
        }
        (registry, keys)
    }

    #[test]
    fn push_returns_one_based_slots() {
        let mut registry = StakerRegistry::default();
        assert_eq!(registry.push(Pubkey::new_unique()).unwrap(), 1);
        assert_eq!(registry.push(Pubkey::new_unique()).unwrap(), 2);
    }

    #[test]
    fn push_beyond_capacity_fails() {
        let (mut registry, _) = registry_of(MAX_STAKERS);
        assert!(registry.push(Pubkey::new_unique()).is_err());
        assert_eq!(registry.len(), MAX_STAKERS);
    }

    #[test]
    fn removing_middle_moves_last_into_hole() {
        let (mut registry, keys) = registry_of(4);

        let moved = registry.swap_remove(2).unwrap();
        assert_eq!(moved, Some(keys[3]));
        assert_eq!(registry.stakers, vec![keys[0], keys[3], keys[2]]);
    }

    #[test]
    fn removing_last_moves_nothing() {
        let (mut registry, keys) = registry_of(3);

        assert_eq!(registry.swap_remove(3).unwrap(), None);
        assert_eq!(registry.stakers, vec![keys[0], keys[1]]);
    }

    #[test]
    fn removing_only_member_empties_registry() {
        let (mut registry, _) = registry_of(1);

        assert_eq!(registry.swap_remove(1).unwrap(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn out_of_range_slots_rejected() {
        let (mut registry, _) = registry_of(2);

        assert!(registry.swap_remove(0).is_err());
        assert!(registry.swap_remove(3).is_err());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn check_slot_matches_owner() {
        let (registry, keys) = registry_of(2);

        assert!(registry.check_slot(2, &keys[1]).is_ok());
        assert!(registry.check_slot(1, &keys[1]).is_err());
        assert!(registry.check_slot(0, &keys[0]).is_err());
    }
}
