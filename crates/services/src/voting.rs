// Path: crates/services/src/voting.rs

//! The token-weighted voting system.
//!
//! One vote per (voter, proposal). Delegation is additive, directional,
//! and revocable; delegated power is counted only when the delegate
//! votes, and a delegator who votes spends only their own power — the
//! delegated amount is never counted twice. Closing a period is
//! idempotent and returns the stored tally thereafter.

use accord_types::app::{Address, FrictionParams, ProposalId, VoteChoice, VotingTally};
use accord_types::error::VotingError;
use std::collections::BTreeMap;

#[derive(Debug)]
struct VotingPeriod {
    friction: FrictionParams,
    votes: BTreeMap<Address, (VoteChoice, u128)>,
    tally: Option<VotingTally>,
}

/// The voting subsystem: open periods keyed by proposal id plus the
/// global delegation graph.
#[derive(Debug, Default)]
pub struct VotingSystem {
    periods: BTreeMap<ProposalId, VotingPeriod>,
    /// delegator -> delegate -> amount.
    delegations: BTreeMap<Address, BTreeMap<Address, u128>>,
}

impl VotingSystem {
    /// Creates an empty voting system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the voting period for a proposal under the given friction.
    pub fn open_period(
        &mut self,
        proposal_id: ProposalId,
        friction: FrictionParams,
    ) -> Result<(), VotingError> {
        if self.periods.contains_key(&proposal_id) {
            return Err(VotingError::PeriodAlreadyOpen(proposal_id));
        }
        self.periods.insert(
            proposal_id,
            VotingPeriod {
                friction,
                votes: BTreeMap::new(),
                tally: None,
            },
        );
        Ok(())
    }

    /// Delegates `amount` of voting power from `from` to `to`. Additive:
    /// repeated delegation to the same delegate accumulates. A voter may
    /// split delegations across multiple delegates.
    pub fn delegate(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), VotingError> {
        if from == to {
            return Err(VotingError::SelfDelegation(from));
        }
        let entry = self
            .delegations
            .entry(from)
            .or_default()
            .entry(to)
            .or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(VotingError::PowerOverflow)?;
        Ok(())
    }

    /// Revokes the delegation from `from` to `to` in full.
    pub fn undelegate(&mut self, from: &Address, to: &Address) -> Result<u128, VotingError> {
        let outgoing = self
            .delegations
            .get_mut(from)
            .ok_or_else(|| VotingError::DelegationNotFound {
                from: from.clone(),
                to: to.clone(),
            })?;
        let amount = outgoing
            .remove(to)
            .ok_or_else(|| VotingError::DelegationNotFound {
                from: from.clone(),
                to: to.clone(),
            })?;
        if outgoing.is_empty() {
            self.delegations.remove(from);
        }
        Ok(amount)
    }

    /// Total power currently delegated to `delegate`.
    pub fn delegated_to(&self, delegate: &Address) -> u128 {
        self.delegations
            .values()
            .filter_map(|targets| targets.get(delegate))
            .sum()
    }

    /// Casts a vote with the voter's own power; active incoming
    /// delegations are added at cast time. Returns the effective power
    /// counted.
    pub fn cast_vote(
        &mut self,
        proposal_id: ProposalId,
        voter: Address,
        choice: VoteChoice,
        own_power: u128,
    ) -> Result<u128, VotingError> {
        let incoming = self.delegated_to(&voter);
        let period = self
            .periods
            .get_mut(&proposal_id)
            .ok_or(VotingError::PeriodNotOpen(proposal_id))?;
        if period.tally.is_some() {
            return Err(VotingError::PeriodNotOpen(proposal_id));
        }
        if period.votes.contains_key(&voter) {
            return Err(VotingError::AlreadyVoted(voter));
        }

        let effective = own_power
            .checked_add(incoming)
            .ok_or(VotingError::PowerOverflow)?;
        period.votes.insert(voter, (choice, effective));
        Ok(effective)
    }

    /// Closes the period and computes the tally. Idempotent: once closed,
    /// the stored tally is returned unchanged.
    pub fn close_period(
        &mut self,
        proposal_id: ProposalId,
        total_supply: u128,
    ) -> Result<VotingTally, VotingError> {
        let period = self
            .periods
            .get_mut(&proposal_id)
            .ok_or(VotingError::PeriodNotOpen(proposal_id))?;
        if let Some(tally) = &period.tally {
            return Ok(tally.clone());
        }

        let mut yes: u128 = 0;
        let mut no: u128 = 0;
        let mut abstain: u128 = 0;
        for (choice, power) in period.votes.values() {
            let bucket = match choice {
                VoteChoice::Yes => &mut yes,
                VoteChoice::No => &mut no,
                VoteChoice::Abstain => &mut abstain,
            };
            *bucket = bucket.checked_add(*power).ok_or(VotingError::PowerOverflow)?;
        }

        let cast = yes
            .checked_add(no)
            .and_then(|v| v.checked_add(abstain))
            .ok_or(VotingError::PowerOverflow)?;
        let participation_rate = if total_supply == 0 {
            0.0
        } else {
            cast as f64 / total_supply as f64
        };
        let quorum_reached = participation_rate >= period.friction.required_quorum;
        let passed = quorum_reached && yes > no;

        let tally = VotingTally {
            yes,
            no,
            abstain,
            participation_rate,
            quorum_reached,
            passed,
        };
        log::info!(
            "closed voting on {}: yes {} / no {} / abstain {}, participation {:.4}, passed {}",
            proposal_id,
            yes,
            no,
            abstain,
            participation_rate,
            passed
        );
        period.tally = Some(tally.clone());
        Ok(tally)
    }

    /// The stored tally, if the period has closed.
    pub fn tally(&self, proposal_id: &ProposalId) -> Option<&VotingTally> {
        self.periods.get(proposal_id).and_then(|p| p.tally.as_ref())
    }
}
