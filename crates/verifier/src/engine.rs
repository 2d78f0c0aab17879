// Path: crates/verifier/src/engine.rs

//! The Channel A verification pipeline.
//!
//! Two entry points share one code path: [`verify`] canonicalizes a
//! proposal and executes the pipeline; [`execute`] runs the pipeline
//! directly on canonical bytes. Fraud proofs call [`execute`] on the
//! witness, so whatever [`verify`] computed on submission is reproducible
//! from the canonical payload alone.

use crate::{canonical, complexity, cycle, paradox};
use accord_types::app::{ChannelAVerdict, Proposal};
use accord_types::params::VerificationParams;
use serde_json::Value;

/// Verifies a proposal from its raw inputs.
///
/// Canonicalization failure is not an error here: a malformed AST is a
/// failing verdict with zeroed sub-flags, exactly reproducible by any
/// conforming implementation.
pub fn verify(proposal: &Proposal, params: &VerificationParams) -> ChannelAVerdict {
    match canonical::canonicalize(&proposal.logic_ast, &proposal.text) {
        Ok(payload) => execute(&payload.bytes, params),
        Err(e) => {
            tracing::debug!(proposer = %proposal.proposer, error = %e, "verification rejected malformed AST");
            ChannelAVerdict::malformed()
        }
    }
}

/// Executes pipeline steps 2–5 on already-canonical bytes.
///
/// The complexity score covers the full payload; the paradox scan covers
/// the normalized-text segment; cycle detection covers the canonical-JSON
/// segment, failing closed when the segment exceeds the cycle budget or
/// does not parse (a witness that was never produced by canonicalization).
pub fn execute(canonical_bytes: &[u8], params: &VerificationParams) -> ChannelAVerdict {
    let complexity_score = complexity::complexity_score(canonical_bytes);

    let (ast_bytes, text_bytes): (&[u8], &[u8]) = match canonical::split_canonical(canonical_bytes) {
        Some(parts) => parts,
        None => (canonical_bytes, &[]),
    };

    let text = String::from_utf8_lossy(text_bytes);
    let paradox_found = paradox::scan(&text);

    let cycle_found = if ast_bytes.len() > params.cycle_budget_bytes {
        // Bounded-time guarantee: oversized graphs are failures, not work.
        true
    } else {
        match serde_json::from_slice::<Value>(ast_bytes) {
            Ok(ast) => cycle::detect(&ast),
            Err(_) => false,
        }
    };

    let pass = complexity_score <= params.max_complexity && !paradox_found && !cycle_found;
    ChannelAVerdict {
        pass,
        complexity_score,
        paradox_found,
        cycle_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_types::app::{Address, Layer};

    fn proposal(logic_ast: &str, text: &str) -> Proposal {
        Proposal {
            proposer: Address::new("rA"),
            logic_ast: logic_ast.to_string(),
            text: text.to_string(),
            layer: Layer::L2Operational,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn simple_transfer_passes() {
        let verdict = verify(
            &proposal(
                r#"{"action":"transfer","amount":100}"#,
                "Transfer 100 tokens to the community fund",
            ),
            &VerificationParams::default(),
        );
        assert!(verdict.pass);
        assert!(!verdict.paradox_found);
        assert!(!verdict.cycle_found);
        assert!((40..=120).contains(&verdict.complexity_score));
    }

    #[test]
    fn paradox_text_fails() {
        let verdict = verify(
            &proposal(
                r#"{"action":"transfer","amount":100}"#,
                "This proposal passes iff it fails.",
            ),
            &VerificationParams::default(),
        );
        assert!(!verdict.pass);
        assert!(verdict.paradox_found);
    }

    #[test]
    fn dependency_cycle_fails() {
        let verdict = verify(
            &proposal(
                r#"{"a":{"dependencies":["b"]},"b":{"dependencies":["a"]}}"#,
                "Two modules that require each other",
            ),
            &VerificationParams::default(),
        );
        assert!(!verdict.pass);
        assert!(verdict.cycle_found);
    }

    #[test]
    fn malformed_ast_yields_zeroed_verdict() {
        let verdict = verify(&proposal("{broken", "text"), &VerificationParams::default());
        assert_eq!(verdict, ChannelAVerdict::malformed());
    }

    #[test]
    fn verify_equals_execute_on_canonical_bytes() {
        let p = proposal(
            r#"{"b":{"deps":["a"]},"a":1}"#,
            "Reorder Keys, add   spaces.",
        );
        let params = VerificationParams::default();
        let payload = canonical::canonicalize(&p.logic_ast, &p.text).unwrap();
        assert_eq!(verify(&p, &params), execute(&payload.bytes, &params));
    }

    #[test]
    fn oversized_ast_fails_closed_on_cycles() {
        let big_value = "x".repeat(70 * 1024);
        let ast = format!(r#"{{"blob":"{}"}}"#, big_value);
        let verdict = verify(&proposal(&ast, "big"), &VerificationParams::default());
        assert!(verdict.cycle_found);
        assert!(!verdict.pass);
    }

    #[test]
    fn complexity_gate_applies() {
        let params = VerificationParams {
            max_complexity: 10,
            ..VerificationParams::default()
        };
        let verdict = verify(
            &proposal(r#"{"action":"transfer","amount":100}"#, "some long description text"),
            &params,
        );
        assert!(verdict.complexity_score > 10);
        assert!(!verdict.pass);
        assert!(!verdict.paradox_found);
        assert!(!verdict.cycle_found);
    }

    #[test]
    fn empty_ast_and_text_pass() {
        let verdict = verify(&proposal("{}", ""), &VerificationParams::default());
        assert!(verdict.pass);
    }
}
