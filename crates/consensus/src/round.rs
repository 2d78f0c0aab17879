// Path: crates/consensus/src/round.rs

//! Per-proposal commit–reveal round state.
//!
//! Phase transitions are driven by `tick(now_ledger)` and are idempotent;
//! late messages are rejected after the owning deadline passes. Within a
//! round, commits and reveals are processed in submission order, and every
//! accepted reveal carries the ledger index it arrived at, which fixes the
//! aggregation order.

use crate::aggregate::aggregate_reveals;
use accord_types::app::{
    AggregatedVerdict, Commitment, Hash32, OracleVerdict, ProposalId, Reveal, RoundPhase,
};
use accord_types::codec;
use accord_types::error::ConsensusError;
use accord_types::params::ConsensusParams;
use std::collections::{BTreeMap, BTreeSet};

/// Computes the binding hash an oracle publishes at commit time:
/// `sha256(canonical_json(verdict) ++ nonce)`.
pub fn commitment_hash(verdict: &OracleVerdict, nonce: &Hash32) -> Result<Hash32, ConsensusError> {
    let mut preimage =
        codec::to_canonical_json(verdict).map_err(ConsensusError::RevealEncoding)?;
    preimage.extend_from_slice(&nonce.0);
    Ok(Hash32(codec::sha256(&preimage)))
}

/// The protocol state of one proposal's oracle review.
#[derive(Debug)]
pub struct CommitRevealRound {
    proposal_id: ProposalId,
    phase: RoundPhase,
    commit_deadline: u64,
    reveal_deadline: u64,
    active_set_size: u32,
    quorum_required: u32,
    commitments: BTreeMap<accord_types::app::Address, Commitment>,
    /// Accepted reveals with the ledger index each arrived at.
    reveals: Vec<(u64, Reveal)>,
    revealed: BTreeSet<accord_types::app::Address>,
    aggregated: Option<AggregatedVerdict>,
}

impl CommitRevealRound {
    /// Initializes a round: one `oracle_window` for commits, a second for
    /// reveals, quorum fixed against the configured active-set size.
    pub fn new(
        proposal_id: ProposalId,
        current_ledger: u64,
        active_set_size: u32,
        params: &ConsensusParams,
    ) -> Self {
        Self {
            proposal_id,
            phase: RoundPhase::Commit,
            commit_deadline: current_ledger.saturating_add(params.oracle_window),
            reveal_deadline: current_ledger.saturating_add(params.oracle_window * 2),
            active_set_size,
            quorum_required: params.quorum_required(),
            commitments: BTreeMap::new(),
            reveals: Vec::new(),
            revealed: BTreeSet::new(),
            aggregated: None,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The ledger index commits close at.
    pub fn commit_deadline(&self) -> u64 {
        self.commit_deadline
    }

    /// The ledger index reveals close at.
    pub fn reveal_deadline(&self) -> u64 {
        self.reveal_deadline
    }

    /// Commitments received so far.
    pub fn commitment_count(&self) -> usize {
        self.commitments.len()
    }

    /// Reveals accepted so far.
    pub fn reveal_count(&self) -> usize {
        self.reveals.len()
    }

    /// The stored aggregation result, once complete.
    pub fn aggregated(&self) -> Option<&AggregatedVerdict> {
        self.aggregated.as_ref()
    }

    /// Advances the phase against the ledger clock. Early transition
    /// happens when every active oracle committed, or every committer
    /// revealed. Idempotent: repeated ticks with the same clock are no-ops.
    pub fn tick(&mut self, now_ledger: u64) -> RoundPhase {
        if self.phase == RoundPhase::Commit {
            let all_committed = self.commitments.len() as u32 >= self.active_set_size;
            if now_ledger >= self.commit_deadline || all_committed {
                self.phase = RoundPhase::Reveal;
                tracing::debug!(proposal = %self.proposal_id, "round entered reveal phase");
            }
        }
        if self.phase == RoundPhase::Reveal {
            let all_revealed =
                !self.commitments.is_empty() && self.revealed.len() == self.commitments.len();
            if now_ledger >= self.reveal_deadline || all_revealed {
                self.phase = RoundPhase::Tallying;
                tracing::debug!(proposal = %self.proposal_id, "round entered tallying");
            }
        }
        self.phase
    }

    /// Accepts one commitment per oracle, before the commit deadline.
    pub fn submit_commit(
        &mut self,
        commitment: Commitment,
        now_ledger: u64,
    ) -> Result<(), ConsensusError> {
        self.tick(now_ledger);
        if self.phase != RoundPhase::Commit || now_ledger >= self.commit_deadline {
            return Err(ConsensusError::CommitPhaseClosed(self.proposal_id));
        }
        if self.commitments.contains_key(&commitment.oracle) {
            return Err(ConsensusError::DuplicateCommitment(commitment.oracle));
        }
        self.commitments.insert(commitment.oracle.clone(), commitment);
        Ok(())
    }

    /// Accepts a reveal iff the oracle committed, the opened verdict and
    /// nonce hash back to the commitment, and the reveal deadline has not
    /// passed. A rejected reveal leaves the oracle counted as
    /// non-revealing.
    pub fn submit_reveal(&mut self, reveal: Reveal, now_ledger: u64) -> Result<(), ConsensusError> {
        self.tick(now_ledger);
        // The tick above leaves Reveal at the deadline, so being in
        // Reveal phase already implies now_ledger < reveal_deadline.
        match self.phase {
            RoundPhase::Reveal => {}
            RoundPhase::Commit => return Err(ConsensusError::NoMatchingCommitment(reveal.oracle)),
            _ => return Err(ConsensusError::RevealPhaseClosed(self.proposal_id)),
        }

        let commitment = self
            .commitments
            .get(&reveal.oracle)
            .ok_or_else(|| ConsensusError::NoMatchingCommitment(reveal.oracle.clone()))?;
        if self.revealed.contains(&reveal.oracle) {
            return Err(ConsensusError::DuplicateReveal(reveal.oracle));
        }

        let opened = commitment_hash(&reveal.verdict, &reveal.nonce)?;
        if opened != commitment.commitment_hash {
            log::warn!(
                "dropping reveal from {}: does not open commitment for {}",
                reveal.oracle,
                self.proposal_id
            );
            return Err(ConsensusError::CommitmentMismatch(reveal.oracle));
        }

        self.revealed.insert(reveal.oracle.clone());
        self.reveals.push((now_ledger, reveal));
        Ok(())
    }

    /// Aggregates the round once it reached tallying; the result is stored
    /// and the round becomes immutable. Repeat calls return the stored
    /// result.
    pub fn aggregate(&mut self) -> Result<AggregatedVerdict, ConsensusError> {
        if let Some(done) = &self.aggregated {
            return Ok(done.clone());
        }
        if self.phase != RoundPhase::Tallying {
            return Err(ConsensusError::NotReadyToTally(self.proposal_id));
        }

        // Fix the aggregation order: ledger index, submission order within.
        let mut ordered = self.reveals.clone();
        ordered.sort_by_key(|(ledger, _)| *ledger);
        let reveals: Vec<Reveal> = ordered.into_iter().map(|(_, r)| r).collect();

        let committers: Vec<accord_types::app::Address> =
            self.commitments.keys().cloned().collect();
        let result = aggregate_reveals(&reveals, &committers, self.quorum_required);

        self.phase = RoundPhase::Complete;
        self.aggregated = Some(result.clone());
        log::info!(
            "round {} complete: participation {}/{}, quorum {}",
            self.proposal_id,
            result.participation,
            self.quorum_required,
            result.quorum_reached
        );
        Ok(result)
    }
}
