// Path: crates/types/src/app/oracle.rs

//! Oracle operator records, epoch accounting, and the commit–reveal
//! message types.
//!
//! The registry exclusively owns `OracleOperator` records; the consensus
//! module exclusively owns per-proposal round state and receives
//! `Commitment`/`Reveal` messages already materialized by the host's
//! adapters.

use crate::app::verdict::OracleVerdict;
use crate::app::{Address, Hash32, ProposalId};
use serde::{Deserialize, Serialize};

/// The lifecycle status of an oracle operator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStatus {
    /// Bonded but outside the active set.
    Candidate,
    /// Selected into the current epoch's active set.
    Active,
    /// Exit requested; bond still locked for one epoch.
    Unbonding,
    /// Permanently removed; the address can never re-register.
    Ejected,
}

/// Participation counters for one operator.
///
/// `successful_reveals` and `missed_reveals` reset at each epoch boundary;
/// the lifetime totals feed audit and the fraud record never resets.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorMetrics {
    /// Lifetime count of rounds the operator committed in.
    pub total_participations: u64,
    /// Reveals accepted this epoch.
    pub successful_reveals: u64,
    /// Reveals missed this epoch.
    pub missed_reveals: u64,
    /// Lifetime reveals missed, kept for audit across epoch resets.
    pub lifetime_missed_reveals: u64,
    /// Lifetime count of proven fraud events against this operator.
    pub fraud_proofs: u64,
    /// The last epoch number in which the operator participated.
    pub last_active_epoch: u64,
}

/// A bonded oracle operator record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OracleOperator {
    /// The operator's substrate account.
    pub address: Address,
    /// Current bond, in drops. Zero once ejected.
    pub bond_drops: u128,
    /// The bond originally deposited, the base for the auto-eject threshold.
    pub original_bond_drops: u128,
    /// Cumulative amount slashed from this operator, in drops.
    pub slashed_drops: u128,
    /// The substrate escrow sequence locking the bond.
    pub escrow_seq: u64,
    /// Current lifecycle status.
    pub status: OperatorStatus,
    /// Participation counters.
    pub metrics: OperatorMetrics,
    /// Wall-clock registration time (ms), the active-set tie-break.
    pub registered_at: u64,
    /// Set when unbonding was initiated (ms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unbonding_at: Option<u64>,
}

/// A fixed ledger-interval window over which the active set, participation
/// metrics, and rewards are accounted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Epoch {
    /// Monotonic epoch number, starting at zero.
    pub number: u64,
    /// First ledger index of the epoch.
    pub start_ledger: u64,
    /// Last ledger index of the epoch.
    pub end_ledger: u64,
    /// The selected active set, at most `active_set_size` addresses.
    pub active_set: Vec<Address>,
}

/// The phase of a per-proposal commit–reveal round.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Accepting commitments.
    Commit,
    /// Accepting reveals from committers.
    Reveal,
    /// Deadlines passed; aggregation pending.
    Tallying,
    /// Aggregation produced; the round is immutable.
    Complete,
}

/// A sealed verdict commitment: the hash published before any verdict is
/// visible, binding the oracle to one answer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Commitment {
    /// The proposal the commitment is for.
    pub proposal_id: ProposalId,
    /// The committing oracle.
    pub oracle: Address,
    /// `sha256(canonical_json(verdict) ++ nonce)`.
    pub commitment_hash: Hash32,
    /// The ledger index at which the substrate recorded the commitment.
    pub ledger_index: u64,
}

/// An opened commitment: the verdict and the nonce that must hash back to
/// the earlier `commitment_hash`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reveal {
    /// The proposal the reveal is for.
    pub proposal_id: ProposalId,
    /// The revealing oracle.
    pub oracle: Address,
    /// The full two-channel verdict.
    pub verdict: OracleVerdict,
    /// The blinding nonce chosen at commit time.
    pub nonce: Hash32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::verdict::{ChannelAVerdict, ChannelBVerdict};

    #[test]
    fn metrics_default_to_zero() {
        let m = OperatorMetrics::default();
        assert_eq!(m.total_participations, 0);
        assert_eq!(m.missed_reveals, 0);
        assert_eq!(m.fraud_proofs, 0);
    }

    #[test]
    fn reveal_serializes_with_hex_nonce() {
        let reveal = Reveal {
            proposal_id: ProposalId([1; 32]),
            oracle: Address::new("rOracle1"),
            verdict: OracleVerdict {
                channel_a: ChannelAVerdict {
                    pass: true,
                    complexity_score: 77,
                    paradox_found: false,
                    cycle_found: false,
                },
                channel_b: ChannelBVerdict::conservative_fallback(),
            },
            nonce: Hash32([0xee; 32]),
        };
        let json = serde_json::to_string(&reveal).unwrap();
        assert!(json.contains(&"ee".repeat(32)));
        let back: Reveal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reveal);
    }
}
