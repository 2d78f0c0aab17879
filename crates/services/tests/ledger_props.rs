// Path: crates/services/tests/ledger_props.rs

//! Property suites for bond conservation and the active-set bound under
//! arbitrary operation sequences.

use accord_services::{OracleRegistry, SlashingLedger};
use accord_types::app::{Address, OperatorStatus, ProposalId};
use accord_types::params::StakingParams;
use proptest::prelude::*;

const BOND: u128 = 100_000_000_000;

/// One step in a randomized epoch: which operator, and what happens to it.
#[derive(Debug, Clone)]
enum Op {
    SlashNonReveal(u8),
    MissReveal(u8),
    TryInactivity(u8),
    SlashFraud(u8),
    InitiateUnbond(u8),
    CompleteUnbond(u8),
    RotateEpoch,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(Op::SlashNonReveal),
        (0u8..12).prop_map(Op::MissReveal),
        (0u8..12).prop_map(Op::TryInactivity),
        (0u8..12).prop_map(Op::SlashFraud),
        (0u8..12).prop_map(Op::InitiateUnbond),
        (0u8..12).prop_map(Op::CompleteUnbond),
        Just(Op::RotateEpoch),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    /// Whatever sequence of slashes, ejections, rotations, and unbonds
    /// runs, drops are neither created nor destroyed:
    /// `deposits == current bonds + released + forfeited`.
    #[test]
    fn bond_conservation_under_arbitrary_histories(
        ops in proptest::collection::vec(op_strategy(), 0..80),
    ) {
        let params = StakingParams::default();
        let mut registry = OracleRegistry::new(params.clone(), 101);
        let mut ledger = SlashingLedger::new(params.clone());
        for i in 0u8..12 {
            let bond = BOND + i as u128 * 1_000;
            registry.register(Address::new(format!("r{}", i)), bond, i as u64, i as u64).unwrap();
            ledger.record_deposit(bond).unwrap();
        }
        registry.start_new_epoch(1_000);

        let mut now_ms: u64 = 1_000;
        let mut next_ledger: u64 = 1_000;
        for op in ops {
            now_ms += 1_000;
            match op {
                Op::SlashNonReveal(i) => {
                    let addr = Address::new(format!("r{}", i));
                    if registry.operator(&addr).map(|o| o.status != OperatorStatus::Ejected).unwrap_or(false) {
                        let _ = ledger.slash_non_reveal(&mut registry, &addr, ProposalId([i; 32]), now_ms);
                    }
                }
                Op::MissReveal(i) => {
                    let _ = registry.record_participation(&Address::new(format!("r{}", i)), false);
                }
                Op::TryInactivity(i) => {
                    let addr = Address::new(format!("r{}", i));
                    if registry.operator(&addr).map(|o| o.status != OperatorStatus::Ejected).unwrap_or(false) {
                        let _ = ledger.maybe_slash_inactivity(&mut registry, &addr, now_ms);
                    }
                }
                Op::SlashFraud(i) => {
                    let addr = Address::new(format!("r{}", i));
                    if registry.operator(&addr).map(|o| o.status != OperatorStatus::Ejected).unwrap_or(false) {
                        let _ = ledger.slash_fraud(&mut registry, &addr, ProposalId([i; 32]), now_ms);
                    }
                }
                Op::InitiateUnbond(i) => {
                    let _ = registry.initiate_unbond(&Address::new(format!("r{}", i)), now_ms);
                }
                Op::CompleteUnbond(i) => {
                    now_ms += StakingParams::default().epoch_duration_ms;
                    if let Ok(record) =
                        registry.complete_unbond(&Address::new(format!("r{}", i)), now_ms)
                    {
                        ledger.record_release(record.bond_drops).unwrap();
                    }
                }
                Op::RotateEpoch => {
                    next_ledger += StakingParams::default().epoch_ledgers;
                    registry.start_new_epoch(next_ledger);
                }
            }
            // The invariant holds after every single step, not just at the end.
            ledger.audit_conservation(&registry).unwrap();
        }
    }

    /// However many operators register, the active set never exceeds its
    /// bound at any epoch boundary, and every member is Active.
    #[test]
    fn active_set_is_bounded(
        operator_count in 1usize..200,
        active_set_size in 1usize..120,
        rotations in 1usize..4,
    ) {
        let mut registry = OracleRegistry::new(StakingParams::default(), active_set_size);
        for i in 0..operator_count {
            registry
                .register(Address::new(format!("r{}", i)), BOND + i as u128, i as u64, i as u64)
                .unwrap();
        }
        for r in 0..rotations {
            let epoch = registry.start_new_epoch((r as u64 + 1) * 10_000);
            prop_assert!(epoch.active_set.len() <= active_set_size);
            prop_assert_eq!(epoch.active_set.len(), operator_count.min(active_set_size));
            for member in &epoch.active_set {
                prop_assert_eq!(
                    registry.operator(member).map(|o| o.status),
                    Some(OperatorStatus::Active)
                );
            }
        }
    }
}
