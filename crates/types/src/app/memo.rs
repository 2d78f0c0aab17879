// Path: crates/types/src/app/memo.rs

//! Bit-stable payload formats for outbound ledger memos.
//!
//! Every memo body is serialized through the canonical JSON codec before
//! submission, so the byte image on the ledger is identical across
//! conforming implementations. The `type` tag set is closed; hosts route
//! on it.

use crate::app::verdict::OracleVerdict;
use crate::app::{Hash32, ProposalId};
use serde::{Deserialize, Serialize};

/// The closed set of memo type tags the kernel emits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoType {
    /// A sealed oracle commitment.
    #[serde(rename = "ORACLE_COMMIT")]
    OracleCommit,
    /// An opened oracle commitment.
    #[serde(rename = "ORACLE_REVEAL")]
    OracleReveal,
    /// A token-weighted vote.
    #[serde(rename = "VOTE")]
    Vote,
    /// A submitted proposal.
    #[serde(rename = "PROPOSAL")]
    Proposal,
    /// A periodic anchor of kernel state roots.
    #[serde(rename = "STATE_ANCHOR")]
    StateAnchor,
    /// An oracle registration.
    #[serde(rename = "ORACLE_REGISTER")]
    OracleRegister,
    /// A fraud-proof submission.
    #[serde(rename = "FRAUD_PROOF")]
    FraudProof,
}

impl MemoType {
    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoType::OracleCommit => "ORACLE_COMMIT",
            MemoType::OracleReveal => "ORACLE_REVEAL",
            MemoType::Vote => "VOTE",
            MemoType::Proposal => "PROPOSAL",
            MemoType::StateAnchor => "STATE_ANCHOR",
            MemoType::OracleRegister => "ORACLE_REGISTER",
            MemoType::FraudProof => "FRAUD_PROOF",
        }
    }
}

/// Body of an `ORACLE_COMMIT` memo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OracleCommitMemo {
    /// The proposal the commitment is for.
    pub proposal_id: ProposalId,
    /// `sha256(canonical_json(verdict) ++ nonce)`.
    pub commitment_hash: Hash32,
    /// Submission wall-clock time (ms).
    pub timestamp: u64,
}

/// Body of an `ORACLE_REVEAL` memo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OracleRevealMemo {
    /// The proposal the reveal is for.
    pub proposal_id: ProposalId,
    /// The opened two-channel verdict.
    pub verdict: OracleVerdict,
    /// The blinding nonce chosen at commit time.
    pub nonce: Hash32,
    /// Submission wall-clock time (ms).
    pub timestamp: u64,
}

/// Body of a `VOTE` memo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoteMemo {
    /// The proposal being voted on.
    pub proposal_id: ProposalId,
    /// `"Yes"`, `"No"`, or `"Abstain"`.
    pub vote: String,
    /// The voting power, as a decimal string to avoid integer-width
    /// assumptions on the substrate side.
    pub power: String,
    /// Submission wall-clock time (ms).
    pub timestamp: u64,
}

/// Body of a `PROPOSAL` memo.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProposalMemo {
    /// The canonical proposal identity.
    pub id: ProposalId,
    /// The raw machine-readable logic.
    pub logic_ast: String,
    /// The natural-language description.
    pub text: String,
    /// The layer wire tag, e.g. `"L2-Operational"`.
    pub layer: String,
}

/// Body of a `STATE_ANCHOR` memo, version 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StateAnchorMemo {
    /// Always `"STATE_ANCHOR"`; kept inline so the payload self-describes.
    #[serde(rename = "type")]
    pub memo_type: String,
    /// Anchor format version; currently `1`.
    pub version: u32,
    /// `sha256(proposals_root ++ oracles_root)`.
    pub root: Hash32,
    /// Hash over the canonical ordered list of proposal ids.
    pub proposals_root: Hash32,
    /// Hash over the canonical ordered list of operator addresses.
    pub oracles_root: Hash32,
    /// Number of proposals covered by `proposals_root`.
    pub proposal_count: u64,
    /// Number of operators covered by `oracles_root`.
    pub oracle_count: u64,
    /// Anchor wall-clock time (ms).
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_canonical_json;

    #[test]
    fn memo_type_tags_are_stable() {
        assert_eq!(MemoType::OracleCommit.as_str(), "ORACLE_COMMIT");
        assert_eq!(MemoType::StateAnchor.as_str(), "STATE_ANCHOR");
        assert_eq!(
            serde_json::to_string(&MemoType::FraudProof).unwrap(),
            "\"FRAUD_PROOF\""
        );
    }

    #[test]
    fn commit_memo_canonical_bytes_are_key_sorted() {
        let memo = OracleCommitMemo {
            proposal_id: ProposalId([5; 32]),
            commitment_hash: Hash32([6; 32]),
            timestamp: 1_700_000_000_000,
        };
        let bytes = to_canonical_json(&memo).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        // Canonical form sorts keys: commitment_hash < proposal_id < timestamp.
        let ch = text.find("commitment_hash").unwrap();
        let pid = text.find("proposal_id").unwrap();
        let ts = text.find("timestamp").unwrap();
        assert!(ch < pid && pid < ts);
    }
}
