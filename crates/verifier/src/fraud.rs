// Path: crates/verifier/src/fraud.rs

//! Fraud-proof re-execution and comparison.
//!
//! A fraud proof carries the canonical payload an oracle claims to have
//! verified and the verdict it submitted. The verifier re-runs the
//! deterministic pipeline on the witness bytes and compares all four
//! verdict fields. Fraud verification itself never fails: it either
//! proves fraud or it does not, and an unverifiable witness is always
//! `NotProven`.

use crate::engine;
use accord_types::app::{ChannelAVerdict, ProposalId};
use accord_types::codec;
use accord_types::params::VerificationParams;
use accord_types::MAX_WITNESS_BYTES;

/// A claim that an oracle's submitted Channel A verdict diverges from the
/// deterministic result.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudProof {
    /// The proposal the verdict was submitted for.
    pub proposal_id: ProposalId,
    /// The verdict the oracle revealed.
    pub claimed_verdict: ChannelAVerdict,
    /// The re-execution witness.
    pub witness: FraudWitness,
}

/// The re-execution witness: the canonical payload bytes, hex-encoded,
/// plus the submitter's free-form trace notes (not verified).
#[derive(Debug, Clone, PartialEq)]
pub struct FraudWitness {
    /// Hex encoding of the full canonical payload.
    pub canonical_payload_hex: String,
    /// Opaque supporting notes; carried for audit, never evaluated.
    pub trace: Vec<String>,
}

/// One field-level divergence between claim and re-execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    /// The verdict field that diverged.
    pub field: &'static str,
    /// The oracle's claimed value, rendered for audit.
    pub claimed: String,
    /// The deterministically recomputed value.
    pub recomputed: String,
}

/// The outcome of fraud verification.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudVerdict {
    /// `true` iff any verdict field diverged.
    pub fraud_detected: bool,
    /// The enumerated divergences, empty when not proven.
    pub discrepancies: Vec<Discrepancy>,
    /// The re-executed verdict, when the witness was verifiable.
    pub recomputed: Option<ChannelAVerdict>,
}

impl FraudVerdict {
    fn not_proven() -> Self {
        Self {
            fraud_detected: false,
            discrepancies: Vec::new(),
            recomputed: None,
        }
    }
}

/// Re-executes Channel A from the witness and compares against the claim.
///
/// Witness sanity requires: valid hex, within the witness size bound, and
/// hashing back to the proposal id it claims to prove fraud for. Anything
/// short of that is `NotProven`, never `Proven`.
pub fn verify_fraud_proof(proof: &FraudProof, params: &VerificationParams) -> FraudVerdict {
    let Ok(bytes) = hex::decode(&proof.witness.canonical_payload_hex) else {
        return FraudVerdict::not_proven();
    };
    if bytes.is_empty() || bytes.len() > MAX_WITNESS_BYTES {
        return FraudVerdict::not_proven();
    }
    if codec::sha256(&bytes) != proof.proposal_id.0 {
        // The witness is not the canonical payload of this proposal.
        return FraudVerdict::not_proven();
    }

    let recomputed = engine::execute(&bytes, params);
    let claimed = &proof.claimed_verdict;

    let mut discrepancies = Vec::new();
    if claimed.pass != recomputed.pass {
        discrepancies.push(Discrepancy {
            field: "pass",
            claimed: claimed.pass.to_string(),
            recomputed: recomputed.pass.to_string(),
        });
    }
    if claimed.complexity_score != recomputed.complexity_score {
        discrepancies.push(Discrepancy {
            field: "complexity_score",
            claimed: claimed.complexity_score.to_string(),
            recomputed: recomputed.complexity_score.to_string(),
        });
    }
    if claimed.paradox_found != recomputed.paradox_found {
        discrepancies.push(Discrepancy {
            field: "paradox_found",
            claimed: claimed.paradox_found.to_string(),
            recomputed: recomputed.paradox_found.to_string(),
        });
    }
    if claimed.cycle_found != recomputed.cycle_found {
        discrepancies.push(Discrepancy {
            field: "cycle_found",
            claimed: claimed.cycle_found.to_string(),
            recomputed: recomputed.cycle_found.to_string(),
        });
    }

    FraudVerdict {
        fraud_detected: !discrepancies.is_empty(),
        discrepancies,
        recomputed: Some(recomputed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical;

    fn witness_for(logic_ast: &str, text: &str) -> (ProposalId, FraudWitness) {
        let payload = canonical::canonicalize(logic_ast, text).unwrap();
        (
            payload.hash,
            FraudWitness {
                canonical_payload_hex: hex::encode(&payload.bytes),
                trace: vec!["recomputed locally".to_string()],
            },
        )
    }

    #[test]
    fn liar_sentence_claim_is_fraud() {
        let (id, witness) = witness_for("{}", "This statement is false.");
        let proof = FraudProof {
            proposal_id: id,
            claimed_verdict: ChannelAVerdict {
                pass: true,
                complexity_score: 500,
                paradox_found: false,
                cycle_found: false,
            },
            witness,
        };
        let verdict = verify_fraud_proof(&proof, &VerificationParams::default());
        assert!(verdict.fraud_detected);
        let fields: Vec<&str> = verdict.discrepancies.iter().map(|d| d.field).collect();
        assert!(fields.contains(&"pass"));
        assert!(fields.contains(&"paradox_found"));
        // The fabricated score also diverges from the deterministic one.
        assert!(fields.contains(&"complexity_score"));
    }

    #[test]
    fn honest_claim_is_not_fraud() {
        let (id, witness) = witness_for(r#"{"a":1}"#, "routine change");
        let bytes = hex::decode(&witness.canonical_payload_hex).unwrap();
        let honest = crate::engine::execute(&bytes, &VerificationParams::default());
        let proof = FraudProof {
            proposal_id: id,
            claimed_verdict: honest,
            witness,
        };
        let verdict = verify_fraud_proof(&proof, &VerificationParams::default());
        assert!(!verdict.fraud_detected);
        assert!(verdict.discrepancies.is_empty());
        assert_eq!(verdict.recomputed, Some(honest));
    }

    #[test]
    fn bad_hex_is_not_proven() {
        let proof = FraudProof {
            proposal_id: ProposalId([1; 32]),
            claimed_verdict: ChannelAVerdict::malformed(),
            witness: FraudWitness {
                canonical_payload_hex: "zz-not-hex".to_string(),
                trace: vec![],
            },
        };
        let verdict = verify_fraud_proof(&proof, &VerificationParams::default());
        assert!(!verdict.fraud_detected);
        assert!(verdict.recomputed.is_none());
    }

    #[test]
    fn unbound_witness_is_not_proven() {
        // Valid payload, but claimed against a different proposal id.
        let (_, witness) = witness_for("{}", "some text");
        let proof = FraudProof {
            proposal_id: ProposalId([7; 32]),
            claimed_verdict: ChannelAVerdict::malformed(),
            witness,
        };
        let verdict = verify_fraud_proof(&proof, &VerificationParams::default());
        assert!(!verdict.fraud_detected);
        assert!(verdict.recomputed.is_none());
    }
}
