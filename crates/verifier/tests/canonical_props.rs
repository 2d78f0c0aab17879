// Path: crates/verifier/tests/canonical_props.rs

//! Property tests for canonicalization stability and verdict
//! reproducibility.

use accord_types::app::{Address, Layer, Proposal};
use accord_types::params::VerificationParams;
use accord_verifier::{canonicalize, verify};
use proptest::prelude::*;

/// Words drawn from a purely word-character alphabet, so punctuation and
/// whitespace edits are the only differences between variants.
fn word() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,8}"
}

fn words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(word(), 0..12)
}

fn key_value_pairs() -> impl Strategy<Value = Vec<(String, u64)>> {
    proptest::collection::btree_map("[a-z]{1,6}", 0u64..1_000_000, 1..6)
        .prop_map(|m| m.into_iter().collect())
}

fn json_object(pairs: &[(String, u64)]) -> String {
    let body: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("\"{}\":{}", k, v))
        .collect();
    format!("{{{}}}", body.join(","))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    /// Reversing object key order must not change the canonical hash.
    #[test]
    fn key_order_is_immaterial(pairs in key_value_pairs(), text in "[a-z ]{0,40}") {
        let forward = json_object(&pairs);
        let mut reversed_pairs = pairs.clone();
        reversed_pairs.reverse();
        let reversed = json_object(&reversed_pairs);

        let a = canonicalize(&forward, &text).unwrap();
        let b = canonicalize(&reversed, &text).unwrap();
        prop_assert_eq!(a.hash, b.hash);
        prop_assert_eq!(a.bytes, b.bytes);
    }

    /// Widening whitespace runs must not change the canonical hash.
    #[test]
    fn whitespace_runs_are_immaterial(ws in words()) {
        let single = ws.join(" ");
        let double = ws.join("  ");
        let tabbed = ws.join(" \t");
        let a = canonicalize("{}", &single).unwrap();
        let b = canonicalize("{}", &double).unwrap();
        let c = canonicalize("{}", &tabbed).unwrap();
        prop_assert_eq!(a.hash, b.hash);
        prop_assert_eq!(b.hash, c.hash);
    }

    /// Trailing punctuation must not change the canonical hash.
    #[test]
    fn trailing_punctuation_is_immaterial(ws in words(), tail in "[.!?,;:]{0,5}") {
        let plain = ws.join(" ");
        let punctuated = format!("{}{}", plain, tail);
        let a = canonicalize("{}", &plain).unwrap();
        let b = canonicalize("{}", &punctuated).unwrap();
        prop_assert_eq!(a.hash, b.hash);
    }

    /// Letter case must not change the canonical hash.
    #[test]
    fn case_is_immaterial(ws in words()) {
        let lower = ws.join(" ");
        let upper = lower.to_uppercase();
        let a = canonicalize("{}", &lower).unwrap();
        let b = canonicalize("{}", &upper).unwrap();
        prop_assert_eq!(a.hash, b.hash);
    }

    /// Two invocations of verify must agree field-for-field.
    #[test]
    fn verdicts_are_reproducible(pairs in key_value_pairs(), text in "[a-zA-Z .!]{0,60}") {
        let p = Proposal {
            proposer: Address::new("rProp"),
            logic_ast: json_object(&pairs),
            text,
            layer: Layer::L2Operational,
            created_at: 0,
        };
        let params = VerificationParams::default();
        prop_assert_eq!(verify(&p, &params), verify(&p, &params));
    }
}
