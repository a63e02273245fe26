mod common;

use anchor_lang::prelude::*;
use common::{Pool, E18};
use proptest::prelude::*;
use reward_ledger::constants::MAX_REWARD_RATE;

const OWNERS: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Deposit(usize, u64, u64),
    Withdraw(usize),
    Harvest(usize),
    Distribute,
    DistributeAs(usize),
    SetRate(u128),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..OWNERS, 0u64..1_000_000, 0u64..1_000_000)
            .prop_map(|(owner, amount, allowance)| Op::Deposit(owner, amount, allowance.max(amount / 2))),
        2 => (0..OWNERS).prop_map(Op::Withdraw),
        2 => (0..OWNERS).prop_map(Op::Harvest),
        1 => Just(Op::Distribute),
        1 => (0..OWNERS).prop_map(Op::DistributeAs),
        2 => (0..=MAX_REWARD_RATE + MAX_REWARD_RATE / 10).prop_map(Op::SetRate),
    ]
}

fn apply(pool: &mut Pool, owners: &[Pubkey], op: &Op, now: u64) -> Result<()> {
    match *op {
        Op::Deposit(owner, amount, allowance) => {
            pool.deposit_with_allowance(owners[owner], amount, allowance, now)
        }
        Op::Withdraw(owner) => pool.withdraw(owners[owner], now).map(|_| ()),
        Op::Harvest(owner) => pool.harvest(owners[owner], now).map(|_| ()),
        Op::Distribute => pool.distribute(now).map(|_| ()),
        Op::DistributeAs(owner) => pool.distribute_as(owners[owner], now).map(|_| ()),
        Op::SetRate(rate) => pool.set_reward_rate(rate, now).map(|_| ()),
    }
}

proptest! {
    #[test]
    fn ledger_invariants_hold(steps in prop::collection::vec((op(), 0u64..500), 1..80)) {
        let mut pool = Pool::new(E18);
        let owners: Vec<Pubkey> = (0..OWNERS).map(|_| Pubkey::new_unique()).collect();

        let mut now = 0u64;
        let mut emission_bound = 0u128;

        for (op, advance) in &steps {
            emission_bound += pool.pool.reward_rate * u128::from(*advance);
            now += advance;

            let before = pool.snapshot();
            let index_before = pool.pool.reward_per_share;
            let slot_before = pool.pool.last_settlement_slot;

            if apply(&mut pool, &owners, op, now).is_err() {
                prop_assert_eq!(pool.snapshot(), before, "{:?} failed but changed state", op);
                continue;
            }

            prop_assert!(pool.pool.reward_per_share >= index_before);
            prop_assert!(pool.pool.last_settlement_slot >= slot_before);
            prop_assert!(pool.pool.last_settlement_slot <= now);
            pool.assert_consistent();

            let owed: u128 = owners
                .iter()
                .map(|owner| pool.pending(owner, now) + pool.stake(owner).total_rewards_claimed)
                .sum();
            prop_assert!(owed <= emission_bound, "owed {} > emitted {}", owed, emission_bound);
        }
    }

    #[test]
    fn equal_stakes_accrue_equally(
        stakers in 1usize..OWNERS,
        amount in 1u64..1_000_000,
        rate in 0..=MAX_REWARD_RATE,
        slots in 1u64..100_000,
    ) {
        let mut pool = Pool::new(rate);
        let owners: Vec<Pubkey> = (0..stakers).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            pool.deposit(*owner, amount, 0).unwrap();
        }

        let total = pool.distribute(slots).unwrap();
        let first = pool.stake(&owners[0]).pending_rewards;

        for owner in &owners {
            prop_assert_eq!(pool.stake(owner).pending_rewards, first);
        }
        prop_assert_eq!(total, first * stakers as u128);
        prop_assert!(total <= rate * u128::from(slots));
    }

    #[test]
    fn harvests_drain_any_pending_balance(rate in 0..=MAX_REWARD_RATE, slots in 1u64..200) {
        let mut pool = Pool::new(rate);
        let alice = Pubkey::new_unique();
        pool.deposit(alice, 1, 0).unwrap();
        pool.withdraw(alice, slots).unwrap();

        let owed = pool.stake(&alice).pending_rewards;
        let mut paid = 0u128;
        while let Ok(amount) = pool.harvest(alice, slots) {
            prop_assert!(amount > 0);
            paid += u128::from(amount);
        }

        prop_assert_eq!(paid, owed);
        prop_assert_eq!(pool.stake(&alice).pending_rewards, 0);
    }

    #[test]
    fn withdraw_order_keeps_registry_consistent(order in Just((0..OWNERS).collect::<Vec<_>>()).prop_shuffle()) {
        let mut pool = Pool::new(E18);
        let owners: Vec<Pubkey> = (0..OWNERS).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            pool.deposit(*owner, 100, 0).unwrap();
        }

        for (step, index) in order.iter().enumerate() {
            let returned = pool.withdraw(owners[*index], step as u64 + 1).unwrap();
            prop_assert_eq!(returned, 100);
            pool.assert_consistent();
            prop_assert_eq!(pool.registry.len(), OWNERS - step - 1);
        }
        prop_assert_eq!(pool.pool.total_staked, 0);
    }
}
