// Path: crates/services/tests/invariant_props.rs

//! Property suites for the router's friction monotonicity and the voting
//! system's tally totality.

use accord_services::{friction, VotingSystem};
use accord_types::app::{Address, DecidabilityClass, FrictionParams, Layer, ProposalId, VoteChoice};
use accord_types::params::RoutingParams;
use proptest::prelude::*;

fn layers() -> impl Strategy<Value = Layer> {
    prop_oneof![
        Just(Layer::L1Constitutional),
        Just(Layer::L2Operational),
        Just(Layer::L3Execution),
    ]
}

fn classes() -> impl Strategy<Value = DecidabilityClass> {
    prop_oneof![
        Just(DecidabilityClass::I),
        Just(DecidabilityClass::II),
        Just(DecidabilityClass::III),
        Just(DecidabilityClass::IV),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    /// Lower alignment must never mean lower friction: if s1 <= s2 then
    /// quorum(s1) >= quorum(s2) and timelock(s1) >= timelock(s2).
    #[test]
    fn friction_is_monotone_in_alignment(
        s1 in 0.0f64..=1.0,
        s2 in 0.0f64..=1.0,
        layer in layers(),
        class in classes(),
    ) {
        let (lo, hi) = if s1 <= s2 { (s1, s2) } else { (s2, s1) };
        let params = RoutingParams::default();
        let f_lo = friction(lo, layer, class, &params);
        let f_hi = friction(hi, layer, class, &params);
        prop_assert!(f_lo.required_quorum >= f_hi.required_quorum - 1e-12);
        prop_assert!(f_lo.timelock_duration_s >= f_hi.timelock_duration_s);
    }

    /// Multipliers stay inside their documented ranges before overrides.
    #[test]
    fn friction_multipliers_stay_in_range(score in -2.0f64..=3.0) {
        let f = friction(score, Layer::L2Operational, DecidabilityClass::II, &RoutingParams::default());
        prop_assert!((1.0..=1.5).contains(&f.quorum_multiplier));
        prop_assert!((1.0..=3.0).contains(&f.timelock_multiplier));
    }

    /// The tally accounts every accepted vote exactly once, and passage
    /// implies quorum.
    #[test]
    fn voting_tally_is_total(
        votes in proptest::collection::vec(
            (0u8..3, 1u128..1_000_000),
            1..40
        ),
        required_quorum in 0.0f64..=1.0,
    ) {
        let id = ProposalId([7; 32]);
        let mut system = VotingSystem::new();
        system
            .open_period(id, FrictionParams {
                required_quorum,
                timelock_duration_s: 86_400,
                quorum_multiplier: 1.0,
                timelock_multiplier: 1.0,
                alignment_score: 0.5,
            })
            .unwrap();

        let mut accepted: u128 = 0;
        for (i, (choice, power)) in votes.iter().enumerate() {
            let choice = match choice {
                0 => VoteChoice::Yes,
                1 => VoteChoice::No,
                _ => VoteChoice::Abstain,
            };
            let voter = Address::new(format!("rV{}", i));
            accepted += system.cast_vote(id, voter, choice, *power).unwrap();
        }

        let total_supply: u128 = 100_000_000;
        let tally = system.close_period(id, total_supply).unwrap();
        prop_assert_eq!(tally.yes + tally.no + tally.abstain, accepted);
        if tally.passed {
            prop_assert!(tally.quorum_reached);
            prop_assert!(tally.yes > tally.no);
        }
    }
}
