//! In-memory pool used to drive the settlement engine without a validator.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use reward_ledger::error::StakingError;
use reward_ledger::settlement;
use reward_ledger::state::{StakePool, StakerRegistry, UserStake};

pub const E18: u128 = reward_ledger::constants::REWARD_PRECISION;

pub struct Pool {
    pub authority: Pubkey,
    pub pool: StakePool,
    pub registry: StakerRegistry,
    pub stakes: HashMap<Pubkey, UserStake>,
}

impl Pool {
    pub fn new(reward_rate: u128) -> Self {
        let authority = Pubkey::new_unique();
        let pool = StakePool {
            authority,
            reward_rate,
            ..Default::default()
        };

        Self {
            authority,
            pool,
            registry: StakerRegistry::default(),
            stakes: HashMap::new(),
        }
    }

    /// Stake record for `owner`, zero-valued if it has never been stored.
    pub fn record(&self, owner: Pubkey) -> UserStake {
        self.stakes.get(&owner).cloned().unwrap_or_else(|| UserStake {
            owner,
            ..Default::default()
        })
    }

    pub fn stake(&self, owner: &Pubkey) -> UserStake {
        self.stakes.get(owner).cloned().unwrap_or_default()
    }

    /// Writes a record back whatever the outcome, so a failed call that
    /// touched it would show up in [`Pool::snapshot`].
    fn put(&mut self, stake: UserStake) {
        let untouched = bytes(&stake) == bytes(&UserStake {
            owner: stake.owner,
            ..Default::default()
        });
        if !untouched || self.stakes.contains_key(&stake.owner) {
            self.stakes.insert(stake.owner, stake);
        }
    }

    pub fn deposit(&mut self, owner: Pubkey, amount: u64, now: u64) -> Result<()> {
        self.deposit_with_allowance(owner, amount, amount, now)
    }

    pub fn deposit_with_allowance(
        &mut self,
        owner: Pubkey,
        amount: u64,
        allowance: u64,
        now: u64,
    ) -> Result<()> {
        let mut user_stake = self.record(owner);
        let result = settlement::deposit(
            &mut self.pool,
            &mut self.registry,
            &mut user_stake,
            amount,
            allowance,
            now,
        );
        self.put(user_stake);
        result
    }

    /// Withdraws, passing the last registry member's record when it moves.
    pub fn withdraw(&mut self, owner: Pubkey, now: u64) -> Result<u64> {
        let mut user_stake = self.record(owner);
        let mut moved = self
            .registry
            .last()
            .filter(|last| **last != owner)
            .map(|last| self.record(*last));

        let result = settlement::withdraw(
            &mut self.pool,
            &mut self.registry,
            &mut user_stake,
            moved.as_mut(),
            now,
        );

        self.put(user_stake);
        if let Some(moved) = moved {
            self.put(moved);
        }
        result
    }

    pub fn harvest(&mut self, owner: Pubkey, now: u64) -> Result<u64> {
        let mut user_stake = self.record(owner);
        let result = settlement::harvest(&mut self.pool, &mut user_stake, now);
        self.put(user_stake);
        result
    }

    /// Registry members' records in registry order.
    pub fn registered_stakes(&self) -> Vec<UserStake> {
        self.registry
            .stakers
            .iter()
            .map(|owner| self.record(*owner))
            .collect()
    }

    fn write_back(&mut self, stakes: Vec<UserStake>) {
        for stake in stakes {
            self.put(stake);
        }
    }

    pub fn distribute(&mut self, now: u64) -> Result<u128> {
        let authority = self.authority;
        self.distribute_as(authority, now)
    }

    pub fn distribute_as(&mut self, caller: Pubkey, now: u64) -> Result<u128> {
        let mut stakes = self.registered_stakes();
        let result =
            settlement::distribute(&mut self.pool, &self.registry, &mut stakes, &caller, now);
        self.write_back(stakes);
        result
    }

    pub fn set_reward_rate(&mut self, new_rate: u128, now: u64) -> Result<u128> {
        let authority = self.authority;
        self.set_reward_rate_as(authority, new_rate, now)
    }

    pub fn set_reward_rate_as(&mut self, caller: Pubkey, new_rate: u128, now: u64) -> Result<u128> {
        let mut stakes = self.registered_stakes();
        let result = settlement::set_reward_rate(
            &mut self.pool,
            &self.registry,
            &mut stakes,
            &caller,
            new_rate,
            now,
        );
        self.write_back(stakes);
        result
    }

    pub fn pending(&self, owner: &Pubkey, now: u64) -> u128 {
        let index = self.pool.current_index(now).unwrap();
        self.stake(owner).pending_reward_of(index).unwrap()
    }

    /// Serialized pool, registry and stake records, keyed by owner.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pool: bytes(&self.pool),
            registry: bytes(&self.registry),
            stakes: self
                .stakes
                .iter()
                .map(|(owner, stake)| (*owner, bytes(stake)))
                .collect(),
        }
    }

    /// Conservation and registry consistency.
    pub fn assert_consistent(&self) {
        let staked: u64 = self.stakes.values().map(|s| s.staked_amount).sum();
        assert_eq!(self.pool.total_staked, staked, "total_staked drifted");

        for (position, owner) in self.registry.stakers.iter().enumerate() {
            let stake = self.stake(owner);
            assert_eq!(stake.registry_slot as usize, position + 1, "slot of {owner}");
            assert!(stake.staked_amount > 0, "registered without stake: {owner}");
        }

        for stake in self.stakes.values() {
            let registered = self.registry.stakers.contains(&stake.owner);
            assert_eq!(registered, stake.staked_amount > 0, "membership of {}", stake.owner);
            if !registered {
                assert_eq!(stake.registry_slot, 0);
            }
            assert!(stake.reward_per_share_paid <= self.pool.reward_per_share);
        }

        let mut unique = self.registry.stakers.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), self.registry.len(), "duplicate registry entry");
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub pool: Vec<u8>,
    pub registry: Vec<u8>,
    pub stakes: BTreeMap<Pubkey, Vec<u8>>,
}

fn bytes<T: AccountSerialize>(account: &T) -> Vec<u8> {
    let mut data = Vec::new();
    account.try_serialize(&mut data).unwrap();
    data
}

/// Asserts `result` failed with `expected`.
pub fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: StakingError) {
    let actual = result.expect_err("operation should have failed");
    match (actual, Error::from(expected)) {
        (Error::AnchorError(actual), Error::AnchorError(expected)) => assert_eq!(
            actual.error_code_number, expected.error_code_number,
            "expected {}, got {}",
            expected.error_name, actual.error_name
        ),
        (actual, _) => panic!("unexpected error: {actual:?}"),
    }
}
