//! Lock scenarios for the VG Locker.
//!
//! These tests drive the same state API `lock_and_earn` uses, in the same
//! order, against in-memory accounts. Token movements are modeled as plain
//! balances; a failing step leaves every balance and aggregate untouched,
//! which is what the runtime guarantees by reverting the transaction.
//!
//! `World::lock_in_place` mirrors `handler_lock_and_earn` in
//! src/instructions/lock_and_earn.rs step for step. Everything after the
//! adapter call goes through `Locker::settle_provision`, which the handler
//! calls too; keep the steps before it in the handler's order.

use anchor_lang::error::Error;
use anchor_lang::prelude::Pubkey;

use vg_locker::adapter::{BalanceSnapshot, ProvisionArgs};
use vg_locker::custody::CustodyReceipt;
use vg_locker::error::LockerError;
use vg_locker::state::{Locker, UserGuard};
use vg_locker::vault::VaultReserve;

// ============================================================================
// Harness
// ============================================================================

fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

fn code(err: Error) -> u32 {
    match err {
        Error::AnchorError(e) => e.error_code_number,
        other => panic!("unexpected error: {other:?}"),
    }
}

/// What the adapter does with the funds it is given
#[derive(Clone, Copy)]
struct AdapterBehavior {
    stake_spent: u64,
    native_spent: u64,
    lp_minted: u64,
    /// VG that left the reward vault while the adapter ran
    vault_drawn: u64,
}

impl AdapterBehavior {
    fn spends_all(stake: u64, native: u64, lp: u64) -> Self {
        Self {
            stake_spent: stake,
            native_spent: native,
            lp_minted: lp,
            vault_drawn: 0,
        }
    }
}

#[derive(Clone)]
struct World {
    locker: Locker,
    guard: UserGuard,
    vault_balance: u64,
    lp_vault_balance: u64,
    caller_stake: u64,
    caller_native: u64,
    caller_reward: u64,
}

impl World {
    fn new(vault_balance: u64) -> Self {
        let locker = Locker {
            authority: key(1),
            liquidity_adapter: key(2),
            lp_to_reward_ratio: 1_000,
            lp_divisor: 1,
            min_stake_amount: 1,
            min_native_amount: 1,
            max_slippage_bps: 500,
            default_slippage_bps: 100,
            mev_protection_enabled: true,
            min_time_between_txs: 0,
            max_tx_per_user_per_block: 1,
            ..Locker::default()
        };

        Self {
            locker,
            guard: UserGuard::default(),
            vault_balance,
            lp_vault_balance: 0,
            caller_stake: 1_000_000,
            caller_native: 1_000_000,
            caller_reward: 0,
        }
    }

    /// One lock_and_earn call at (`now`, `slot`). All-or-nothing.
    fn lock(
        &mut self,
        stake: u64,
        native: u64,
        min_lp_out: u64,
        adapter: AdapterBehavior,
        now: i64,
        slot: u64,
    ) -> anchor_lang::Result<u64> {
        let mut next = self.clone();
        let reward = next.lock_in_place(stake, native, min_lp_out, adapter, now, slot)?;
        *self = next;
        Ok(reward)
    }

    fn lock_in_place(
        &mut self,
        stake: u64,
        native: u64,
        min_lp_out: u64,
        adapter: AdapterBehavior,
        now: i64,
        slot: u64,
    ) -> anchor_lang::Result<u64> {
        self.locker.check_open()?;
        self.locker.check_minimums(stake, native)?;
        let slippage_bps = self.locker.resolve_slippage(None)?;
        self.guard.check(&self.locker.guard_params(), now, slot)?;

        let reserve = VaultReserve {
            balance: self.vault_balance,
            allowance: None,
        };
        reserve.plan_disbursement(self.locker.calculate_reward(min_lp_out)?)?;

        self.caller_stake -= stake;
        self.caller_native -= native;
        let receipt = CustodyReceipt::new(stake, native);
        self.guard.record(now, slot)?;

        let args = ProvisionArgs::new(stake, native, slippage_bps, now)?;
        let before = BalanceSnapshot {
            stake_custody: stake,
            native_custody: native,
            lp_lock_vault: self.lp_vault_balance,
            reward_vault: self.vault_balance,
        };
        let after = BalanceSnapshot {
            stake_custody: stake - adapter.stake_spent,
            native_custody: native - adapter.native_spent,
            lp_lock_vault: self.lp_vault_balance + adapter.lp_minted,
            reward_vault: self.vault_balance - adapter.vault_drawn,
        };
        let settlement = self
            .locker
            .settle_provision(receipt, &args, &before, &after, min_lp_out)?;
        self.lp_vault_balance = after.lp_lock_vault;

        self.caller_stake += settlement.refund.stake;
        self.caller_native += settlement.refund.native;

        let reward = settlement.reward;
        self.vault_balance = reserve.plan_disbursement(reward)?;
        self.caller_reward += reward;

        self.locker.record_lock(settlement.outcome.lp_received, reward)?;
        Ok(reward)
    }
}

// ============================================================================
// Reward Issuance
// ============================================================================

#[test]
fn five_lp_at_default_ratio_pays_five_thousand() {
    let mut world = World::new(10_000);

    let reward = world
        .lock(100, 200, 0, AdapterBehavior::spends_all(100, 200, 5), 1_000, 1)
        .unwrap();

    assert_eq!(reward, 5_000);
    assert_eq!(world.caller_reward, 5_000);
    assert_eq!(world.vault_balance, 5_000);
    assert_eq!(world.locker.total_locked_lp, 5);
    assert_eq!(world.locker.total_reward_issued, 5_000);
    assert_eq!(world.locker.lock_count, 1);
}

#[test]
fn reward_is_floored() {
    let mut locker = World::new(0).locker;
    locker.lp_to_reward_ratio = 2;
    locker.lp_divisor = 3;

    assert_eq!(locker.calculate_reward(1).unwrap(), 0);
    assert_eq!(locker.calculate_reward(5).unwrap(), 3);
    assert_eq!(locker.calculate_reward(u64::MAX).unwrap(), u64::MAX / 3 * 2);
}

#[test]
fn reward_overflowing_u64_is_rejected() {
    let mut locker = World::new(0).locker;
    locker.lp_to_reward_ratio = 2;

    let err = locker.calculate_reward(u64::MAX).unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::MathOverflow));
}

// ============================================================================
// Vault Reserve
// ============================================================================

#[test]
fn short_vault_rejects_the_lock_and_keeps_its_balance() {
    let mut world = World::new(100);
    let before = world.clone();

    world.locker.lp_to_reward_ratio = 10;
    let err = world
        .lock(100, 200, 0, AdapterBehavior::spends_all(100, 200, 15), 1_000, 1)
        .unwrap_err();

    assert_eq!(code(err), u32::from(LockerError::InsufficientVaultReserve));
    assert_eq!(world.vault_balance, 100);
    assert_eq!(world.caller_stake, before.caller_stake);
    assert_eq!(world.locker.total_locked_lp, 0);
    assert_eq!(world.guard.total_locks, 0);
}

#[test]
fn vault_precheck_uses_the_callers_minimum() {
    let mut world = World::new(100);

    let err = world
        .lock(100, 200, 1, AdapterBehavior::spends_all(100, 200, 1), 1_000, 1)
        .unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::InsufficientVaultReserve));
}

// ============================================================================
// Rate/Abuse Guard
// ============================================================================

#[test]
fn second_lock_in_the_same_slot_is_rate_limited() {
    let mut world = World::new(1_000_000);
    let adapter = AdapterBehavior::spends_all(100, 200, 1);

    world.lock(100, 200, 0, adapter, 1_000, 7).unwrap();
    let err = world.lock(100, 200, 0, adapter, 1_000, 7).unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::RateLimited));

    world.lock(100, 200, 0, adapter, 1_001, 8).unwrap();
    assert_eq!(world.locker.lock_count, 2);
    assert_eq!(world.guard.total_locks, 2);
}

#[test]
fn min_time_between_locks_is_enforced() {
    let mut world = World::new(1_000_000);
    world.locker.min_time_between_txs = 30;
    let adapter = AdapterBehavior::spends_all(100, 200, 1);

    world.lock(100, 200, 0, adapter, 1_000, 1).unwrap();

    let err = world.lock(100, 200, 0, adapter, 1_029, 2).unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::RateLimited));

    world.lock(100, 200, 0, adapter, 1_030, 3).unwrap();
}

#[test]
fn failed_lock_does_not_consume_the_rate_limit() {
    let mut world = World::new(1_000_000);

    let bad = AdapterBehavior::spends_all(100, 200, 0);
    assert!(world.lock(100, 200, 0, bad, 1_000, 1).is_err());

    let good = AdapterBehavior::spends_all(100, 200, 1);
    world.lock(100, 200, 0, good, 1_000, 1).unwrap();
}

#[test]
fn disabled_protection_allows_bursts() {
    let mut world = World::new(1_000_000);
    world.locker.mev_protection_enabled = false;
    let adapter = AdapterBehavior::spends_all(100, 200, 1);

    for _ in 0..3 {
        world.lock(100, 200, 0, adapter, 1_000, 1).unwrap();
    }
    assert_eq!(world.locker.lock_count, 3);
}

// ============================================================================
// Slippage & Custody
// ============================================================================

#[test]
fn adapter_spending_below_floor_is_slippage() {
    let mut world = World::new(1_000_000);

    // Default slippage 1%: floor for 10_000 stake is 9_900
    let adapter = AdapterBehavior {
        stake_spent: 9_899,
        native_spent: 20_000,
        lp_minted: 5,
        vault_drawn: 0,
    };
    let err = world.lock(10_000, 20_000, 0, adapter, 1_000, 1).unwrap_err();

    assert_eq!(code(err), u32::from(LockerError::SlippageExceeded));
    assert_eq!(world.locker.total_locked_lp, 0);
    assert_eq!(world.caller_stake, 1_000_000);
}

#[test]
fn native_achieved_below_floor_is_slippage() {
    let mut world = World::new(1_000_000);

    // Default slippage 1%: floor for 20_000 native is 19_800
    let adapter = AdapterBehavior {
        stake_spent: 10_000,
        native_spent: 19_799,
        lp_minted: 5,
        vault_drawn: 0,
    };
    let err = world.lock(10_000, 20_000, 0, adapter, 1_000, 1).unwrap_err();

    assert_eq!(code(err), u32::from(LockerError::SlippageExceeded));
    assert_eq!(world.caller_native, 1_000_000);
    assert_eq!(world.caller_stake, 1_000_000);
    assert_eq!(world.caller_reward, 0);
    assert_eq!(world.locker.total_locked_lp, 0);
}

#[test]
fn lp_below_caller_minimum_is_slippage() {
    let mut world = World::new(1_000_000);

    let err = world
        .lock(100, 200, 6, AdapterBehavior::spends_all(100, 200, 5), 1_000, 1)
        .unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::SlippageExceeded));
}

#[test]
fn zero_lp_is_a_provisioning_failure() {
    let mut world = World::new(1_000_000);

    let err = world
        .lock(100, 200, 0, AdapterBehavior::spends_all(100, 200, 0), 1_000, 1)
        .unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::ProvisioningFailed));
}

#[test]
fn unspent_custody_is_refunded() {
    let mut world = World::new(1_000_000);

    let adapter = AdapterBehavior {
        stake_spent: 9_950,
        native_spent: 19_900,
        lp_minted: 3,
        vault_drawn: 0,
    };
    world.lock(10_000, 20_000, 0, adapter, 1_000, 1).unwrap();

    assert_eq!(world.caller_stake, 1_000_000 - 9_950);
    assert_eq!(world.caller_native, 1_000_000 - 19_900);
}

#[test]
fn dust_is_below_minimum() {
    let mut world = World::new(1_000_000);
    world.locker.min_native_amount = 1_000;

    let err = world
        .lock(100, 999, 0, AdapterBehavior::spends_all(100, 999, 1), 1_000, 1)
        .unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::BelowMinimum));
}

#[test]
fn adapter_drawing_on_the_reward_vault_fails_the_lock() {
    let mut world = World::new(1_000_000);

    let adapter = AdapterBehavior {
        vault_drawn: 1,
        ..AdapterBehavior::spends_all(100, 200, 5)
    };
    let err = world.lock(100, 200, 0, adapter, 1_000, 1).unwrap_err();

    assert_eq!(code(err), u32::from(LockerError::ProvisioningFailed));
    assert_eq!(world.vault_balance, 1_000_000);
    assert_eq!(world.caller_reward, 0);
}

// ============================================================================
// Admission
// ============================================================================

#[test]
fn paused_locker_rejects_locks_until_unpaused() {
    let mut world = World::new(1_000_000);
    let adapter = AdapterBehavior::spends_all(100, 200, 1);

    world.locker.is_paused = true;
    let err = world.lock(100, 200, 0, adapter, 1_000, 1).unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::LockerPaused));
    assert_eq!(world.guard.total_locks, 0);
    assert_eq!(world.caller_stake, 1_000_000);

    world.locker.is_paused = false;
    world.lock(100, 200, 0, adapter, 1_000, 1).unwrap();
}

#[test]
fn lock_reentering_mid_flight_is_rejected() {
    let mut world = World::new(1_000_000);
    let adapter = AdapterBehavior::spends_all(100, 200, 1);

    // State the adapter would observe on re-entry
    world.locker.in_flight = true;
    let err = world.lock(100, 200, 0, adapter, 1_000, 1).unwrap_err();

    assert_eq!(code(err), u32::from(LockerError::ReentrantCall));
    assert_eq!(world.locker.lock_count, 0);
    assert_eq!(world.vault_balance, 1_000_000);
}

// ============================================================================
// Permanence
// ============================================================================

#[test]
fn locked_lp_only_grows_by_exact_amounts() {
    let mut world = World::new(u64::MAX / 2);
    let mut expected_lp = 0u64;
    let mut expected_reward = 0u64;

    for (i, lp) in [5u64, 1, 17, 3].into_iter().enumerate() {
        let slot = i as u64 + 1;
        let reward = world
            .lock(100, 200, 0, AdapterBehavior::spends_all(100, 200, lp), 1_000, slot)
            .unwrap();

        expected_lp += lp;
        expected_reward += reward;
        assert_eq!(world.locker.total_locked_lp, expected_lp);
        assert_eq!(world.locker.total_reward_issued, expected_reward);
        assert_eq!(world.lp_vault_balance, world.locker.total_locked_lp);
    }

    // Failures in between never move the aggregates
    let err = world
        .lock(100, 200, 0, AdapterBehavior::spends_all(100, 200, 0), 1_000, 99)
        .unwrap_err();
    assert_eq!(code(err), u32::from(LockerError::ProvisioningFailed));
    assert_eq!(world.locker.total_locked_lp, expected_lp);
    assert_eq!(world.lp_vault_balance, expected_lp);
}
