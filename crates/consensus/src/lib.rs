// Path: crates/consensus/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Accord Commit–Reveal Consensus
//!
//! Two-phase oracle aggregation without information leakage: oracles first
//! publish a hash binding them to a verdict, then open it with the verdict
//! and nonce. This module exclusively owns the per-proposal protocol
//! state; callers refer to rounds by proposal id only. Aggregation is a
//! pure function of the ledger-index-ordered multiset of accepted reveals,
//! with no wall-clock dependency once tallying starts.

pub mod aggregate;
pub mod round;

pub use aggregate::aggregate_reveals;
pub use round::{commitment_hash, CommitRevealRound};

use accord_types::app::{AggregatedVerdict, Commitment, ProposalId, Reveal, RoundPhase};
use accord_types::error::ConsensusError;
use accord_types::params::ConsensusParams;
use std::collections::BTreeMap;

/// The engine owning every in-flight commit–reveal round, keyed by
/// proposal id. Rounds are independent; there are no cross-round ordering
/// guarantees.
#[derive(Debug, Default)]
pub struct CommitRevealEngine {
    params: ConsensusParams,
    rounds: BTreeMap<ProposalId, CommitRevealRound>,
}

impl CommitRevealEngine {
    /// Creates an engine with the given protocol parameters.
    pub fn new(params: ConsensusParams) -> Self {
        Self {
            params,
            rounds: BTreeMap::new(),
        }
    }

    /// Opens a round for a proposal. Deadlines derive from the current
    /// ledger index plus one window for commits and a second for reveals.
    pub fn open_round(
        &mut self,
        proposal_id: ProposalId,
        current_ledger: u64,
        active_set_size: u32,
    ) -> Result<(), ConsensusError> {
        if self.rounds.contains_key(&proposal_id) {
            return Err(ConsensusError::RoundAlreadyExists(proposal_id));
        }
        let round = CommitRevealRound::new(proposal_id, current_ledger, active_set_size, &self.params);
        log::debug!(
            "opened commit-reveal round for {} (commit until {}, reveal until {})",
            proposal_id,
            round.commit_deadline(),
            round.reveal_deadline()
        );
        self.rounds.insert(proposal_id, round);
        Ok(())
    }

    /// Read access to a round.
    pub fn round(&self, proposal_id: &ProposalId) -> Option<&CommitRevealRound> {
        self.rounds.get(proposal_id)
    }

    /// Submits a commitment into its round.
    pub fn submit_commit(
        &mut self,
        commitment: Commitment,
        now_ledger: u64,
    ) -> Result<(), ConsensusError> {
        let round = self
            .rounds
            .get_mut(&commitment.proposal_id)
            .ok_or(ConsensusError::UnknownRound(commitment.proposal_id))?;
        round.submit_commit(commitment, now_ledger)
    }

    /// Submits a reveal into its round.
    pub fn submit_reveal(&mut self, reveal: Reveal, now_ledger: u64) -> Result<(), ConsensusError> {
        let round = self
            .rounds
            .get_mut(&reveal.proposal_id)
            .ok_or(ConsensusError::UnknownRound(reveal.proposal_id))?;
        round.submit_reveal(reveal, now_ledger)
    }

    /// Advances a round's phase against the ledger clock. Idempotent.
    pub fn tick(&mut self, proposal_id: &ProposalId, now_ledger: u64) -> Result<RoundPhase, ConsensusError> {
        let round = self
            .rounds
            .get_mut(proposal_id)
            .ok_or(ConsensusError::UnknownRound(*proposal_id))?;
        Ok(round.tick(now_ledger))
    }

    /// Aggregates a round that has reached tallying. Returns the stored
    /// result on repeat calls.
    pub fn aggregate(&mut self, proposal_id: &ProposalId) -> Result<AggregatedVerdict, ConsensusError> {
        let round = self
            .rounds
            .get_mut(proposal_id)
            .ok_or(ConsensusError::UnknownRound(*proposal_id))?;
        round.aggregate()
    }
}
