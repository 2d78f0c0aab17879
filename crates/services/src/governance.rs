// Path: crates/services/src/governance.rs

//! The governance orchestrator.
//!
//! Sole writer of `GovernanceProposal` records. The orchestrator sequences
//! each proposal through review, routing, voting, jury, timelock, and
//! execution, driven by external events the host feeds in (aggregated
//! oracle verdicts, vote closes, jury verdicts, ticker calls) and emits an
//! observable `LifecycleEvent` on every transition. Invalid transition
//! requests are rejected with an error and never corrupt state; rejection
//! at any stage is terminal and records a reason.

use accord_api::assessor::SemanticAssessor;
use accord_api::events::EventObserver;
use accord_types::app::memo::{ProposalMemo, StateAnchorMemo};
use accord_types::app::{
    AggregatedVerdict, Address, ChannelAVerdict, ChannelBVerdict, GovernancePhase,
    GovernanceProposal, Hash32, JuryOutcome, JuryVerdict, Layer, LifecycleEvent, Proposal,
    ProposalId, Route, RoutingOutcome, VoteChoice, VotingTally,
};
use accord_types::codec;
use accord_types::error::GovernanceError;
use accord_types::params::{RoutingParams, VerificationParams};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The result of accepting a proposal: its identity, the locally computed
/// Channel A verdict, and the `PROPOSAL` memo for the host to anchor.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The canonical identity.
    pub id: ProposalId,
    /// The local Channel A verdict (oracles recompute their own).
    pub channel_a: ChannelAVerdict,
    /// The memo body the host submits to the substrate.
    pub memo: ProposalMemo,
}

/// The governance lifecycle state machine.
pub struct GovernanceOrchestrator {
    verification: VerificationParams,
    routing: RoutingParams,
    proposals: BTreeMap<ProposalId, GovernanceProposal>,
    observer: Arc<dyn EventObserver>,
}

impl GovernanceOrchestrator {
    /// Creates an orchestrator publishing events to `observer`.
    pub fn new(
        verification: VerificationParams,
        routing: RoutingParams,
        observer: Arc<dyn EventObserver>,
    ) -> Self {
        Self {
            verification,
            routing,
            proposals: BTreeMap::new(),
            observer,
        }
    }

    /// Accepts a proposal: canonicalize, verify Channel A locally, create
    /// the envelope in `Submitted`, and emit `Submitted`. The host then
    /// opens the commit–reveal round under the consensus lock and calls
    /// [`Self::begin_oracle_review`].
    pub fn submit(&mut self, proposal: Proposal) -> Result<SubmitOutcome, GovernanceError> {
        let payload =
            accord_verifier::canonicalize(&proposal.logic_ast, &proposal.text)?;
        let id = payload.hash;
        if self.proposals.contains_key(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let channel_a = accord_verifier::verify(&proposal, &self.verification);
        let memo = ProposalMemo {
            id,
            logic_ast: proposal.logic_ast.clone(),
            text: proposal.text.clone(),
            layer: proposal.layer.as_str().to_string(),
        };

        self.proposals.insert(
            id,
            GovernanceProposal {
                id,
                proposal,
                phase: GovernancePhase::Submitted,
                channel_a: Some(channel_a),
                aggregated: None,
                channel_b: None,
                routing: None,
                voting_tally: None,
                jury: None,
                timelock_expiry: None,
                execution_tx: None,
                rejection_reason: None,
            },
        );
        tracing::info!(proposal = %id, "proposal submitted");
        self.emit(LifecycleEvent::Submitted { id });
        Ok(SubmitOutcome {
            id,
            channel_a,
            memo,
        })
    }

    /// Moves a submitted proposal into oracle review. The host calls this
    /// as it opens the commit–reveal round, so a proposal read between the
    /// two steps shows the `Submitted` phase.
    pub fn begin_oracle_review(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        let entry = self.expect_phase(&id, GovernancePhase::Submitted, "begin_oracle_review")?;
        entry.phase = GovernancePhase::OracleReview;
        Ok(())
    }

    /// Consumes the aggregated oracle verdict, obtains Channel B from the
    /// assessor (falling back conservatively on failure), and routes the
    /// proposal. Returns the routing outcome the host acts on.
    pub async fn complete_oracle_review(
        &mut self,
        id: ProposalId,
        aggregated: AggregatedVerdict,
        assessor: &dyn SemanticAssessor,
    ) -> Result<RoutingOutcome, GovernanceError> {
        let entry = self.expect_phase(&id, GovernancePhase::OracleReview, "complete_oracle_review")?;
        let proposal = entry.proposal.clone();
        let layer = proposal.layer;

        entry.aggregated = Some(aggregated.clone());
        self.emit(LifecycleEvent::ReviewComplete {
            id,
            aggregated: aggregated.clone(),
        });

        if !aggregated.quorum_reached {
            let outcome = RoutingOutcome {
                route: Route::Rejected,
                friction: crate::routing::friction(
                    aggregated.alignment_score,
                    layer,
                    aggregated.decidability_class,
                    &self.routing,
                ),
                rejection_reason: Some(format!(
                    "Oracle quorum not reached: {} of {} required reveals",
                    aggregated.participation, aggregated.quorum_required
                )),
            };
            self.store_routing(&id, outcome.clone())?;
            return Ok(outcome);
        }

        // External failure is absorbed: the conservative fallback stands in.
        let channel_b = match assessor.analyze(&proposal).await {
            Ok(verdict) => verdict,
            Err(e) => {
                log::warn!("assessor failed for {}: {}; using conservative fallback", id, e);
                ChannelBVerdict::conservative_fallback()
            }
        };

        let outcome = crate::routing::decide(layer, &aggregated.channel_a, &channel_b, &self.routing);
        if let Some(entry) = self.proposals.get_mut(&id) {
            entry.channel_b = Some(channel_b);
            entry.phase = GovernancePhase::Routing;
        }
        self.store_routing(&id, outcome.clone())?;
        Ok(outcome)
    }

    /// Applies a routing outcome: transition, emit, and for terminal
    /// routes record the reason.
    fn store_routing(&mut self, id: &ProposalId, outcome: RoutingOutcome) -> Result<(), GovernanceError> {
        let entry = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::UnknownProposal(*id))?;
        entry.routing = Some(outcome.clone());
        self.emit(LifecycleEvent::Routed {
            id: *id,
            route: outcome.route,
        });

        match outcome.route {
            Route::Rejected => {
                let reason = outcome
                    .rejection_reason
                    .unwrap_or_else(|| "Rejected by router".to_string());
                self.reject(id, reason);
            }
            Route::StandardVoting => self.enter_voting(id),
            Route::FormalVerification => self.set_phase(id, GovernancePhase::FormalVerification),
            Route::ConstitutionalJury => self.set_phase(id, GovernancePhase::JuryReview),
            Route::HumanMajorityJury => self.set_phase(id, GovernancePhase::HumanMajorityJury),
        }
        Ok(())
    }

    /// Records the external formal-verification outcome: approval falls
    /// through to voting, anything else is terminal.
    pub fn on_formal_verification(
        &mut self,
        id: ProposalId,
        approved: bool,
    ) -> Result<(), GovernanceError> {
        self.expect_phase(&id, GovernancePhase::FormalVerification, "on_formal_verification")?;
        if approved {
            self.enter_voting(&id);
        } else {
            self.reject(&id, "External formal verification failed".to_string());
        }
        Ok(())
    }

    /// Records the sampled jury panel and emits `JurySelected`.
    pub fn on_jury_selected(
        &mut self,
        id: ProposalId,
        panel: Vec<Address>,
    ) -> Result<(), GovernanceError> {
        let entry = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        match entry.phase {
            GovernancePhase::JuryReview | GovernancePhase::HumanMajorityJury => {}
            phase => {
                return Err(GovernanceError::InvalidTransition {
                    phase,
                    operation: "on_jury_selected".to_string(),
                })
            }
        }
        entry.jury = Some(JuryOutcome {
            panel: panel.clone(),
            verdict: None,
        });
        self.emit(LifecycleEvent::JurySelected { id, panel });
        Ok(())
    }

    /// Consumes a jury verdict. Approval proceeds to voting for L1
    /// proposals and straight to timelock otherwise; `NoVerdict` is
    /// treated as rejection.
    pub fn on_jury_verdict(
        &mut self,
        id: ProposalId,
        verdict: JuryVerdict,
        now_ms: u64,
    ) -> Result<(), GovernanceError> {
        let entry = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        match entry.phase {
            GovernancePhase::JuryReview | GovernancePhase::HumanMajorityJury => {}
            phase => {
                return Err(GovernanceError::InvalidTransition {
                    phase,
                    operation: "on_jury_verdict".to_string(),
                })
            }
        }
        let layer = entry.proposal.layer;
        if let Some(jury) = entry.jury.as_mut() {
            jury.verdict = Some(verdict);
        } else {
            entry.jury = Some(JuryOutcome {
                panel: Vec::new(),
                verdict: Some(verdict),
            });
        }
        self.emit(LifecycleEvent::VerdictReached { id, verdict });

        match verdict {
            JuryVerdict::Approved => {
                if layer == Layer::L1Constitutional {
                    self.enter_voting(&id);
                } else {
                    self.emit(LifecycleEvent::Passed { id });
                    self.start_timelock(&id, now_ms);
                }
            }
            JuryVerdict::Rejected => self.reject(&id, "Rejected by jury".to_string()),
            JuryVerdict::NoVerdict => {
                self.reject(&id, "Jury reached no verdict".to_string())
            }
        }
        Ok(())
    }

    /// Relays an accepted vote so per-proposal event ordering includes it.
    pub fn on_vote_cast(
        &mut self,
        id: ProposalId,
        voter: Address,
        choice: VoteChoice,
        power: u128,
    ) -> Result<(), GovernanceError> {
        self.expect_phase(&id, GovernancePhase::Voting, "on_vote_cast")?;
        self.emit(LifecycleEvent::VoteCast {
            id,
            voter,
            choice,
            power,
        });
        Ok(())
    }

    /// Consumes a closed voting tally: passage starts the timelock,
    /// anything else is terminal.
    pub fn on_voting_closed(
        &mut self,
        id: ProposalId,
        tally: VotingTally,
        now_ms: u64,
    ) -> Result<(), GovernanceError> {
        let entry = self.expect_phase(&id, GovernancePhase::Voting, "on_voting_closed")?;
        entry.voting_tally = Some(tally.clone());
        self.emit(LifecycleEvent::VotingClosed {
            id,
            tally: tally.clone(),
        });

        if tally.passed {
            self.emit(LifecycleEvent::Passed { id });
            self.start_timelock(&id, now_ms);
        } else if !tally.quorum_reached {
            self.reject(&id, "Voting quorum not reached".to_string());
        } else {
            self.reject(&id, "Rejected by vote".to_string());
        }
        Ok(())
    }

    /// The idempotent ticker: expires matured timelocks. Returns the ids
    /// that became executable on this tick.
    pub fn check_phase_transitions(&mut self, now_ms: u64) -> Vec<ProposalId> {
        let matured: Vec<ProposalId> = self
            .proposals
            .values()
            .filter(|p| {
                p.phase == GovernancePhase::Timelock
                    && p.timelock_expiry.map(|t| now_ms >= t).unwrap_or(false)
            })
            .map(|p| p.id)
            .collect();
        for id in &matured {
            self.set_phase(id, GovernancePhase::ReadyToExecute);
            self.emit(LifecycleEvent::TimelockExpired { id: *id });
        }
        matured
    }

    /// Marks an executable proposal as executed on the substrate.
    pub fn execute(&mut self, id: ProposalId, tx_hash: String) -> Result<(), GovernanceError> {
        let entry = self.expect_phase(&id, GovernancePhase::ReadyToExecute, "execute")?;
        entry.execution_tx = Some(tx_hash.clone());
        entry.phase = GovernancePhase::Executed;
        tracing::info!(proposal = %id, tx = %tx_hash, "proposal executed");
        self.emit(LifecycleEvent::Executed { id, tx_hash });
        Ok(())
    }

    /// Read access to one proposal envelope.
    pub fn proposal(&self, id: &ProposalId) -> Option<&GovernanceProposal> {
        self.proposals.get(id)
    }

    /// Iterates all proposal envelopes.
    pub fn proposals(&self) -> impl Iterator<Item = &GovernanceProposal> {
        self.proposals.values()
    }

    /// Builds the version-1 state anchor over the current proposal set and
    /// the given operator list.
    pub fn state_anchor(&self, oracle_addresses: &[Address], now_ms: u64) -> StateAnchorMemo {
        let mut proposal_ids: Vec<ProposalId> = self.proposals.keys().copied().collect();
        proposal_ids.sort();
        let mut proposal_bytes = Vec::with_capacity(proposal_ids.len() * 32);
        for pid in &proposal_ids {
            proposal_bytes.extend_from_slice(&pid.0);
        }
        let proposals_root = Hash32(codec::sha256(&proposal_bytes));

        let mut oracles: Vec<&Address> = oracle_addresses.iter().collect();
        oracles.sort();
        let mut oracle_bytes = Vec::new();
        for addr in &oracles {
            oracle_bytes.extend_from_slice(addr.as_str().as_bytes());
            oracle_bytes.push(0);
        }
        let oracles_root = Hash32(codec::sha256(&oracle_bytes));

        let mut root_bytes = Vec::with_capacity(64);
        root_bytes.extend_from_slice(&proposals_root.0);
        root_bytes.extend_from_slice(&oracles_root.0);

        StateAnchorMemo {
            memo_type: "STATE_ANCHOR".to_string(),
            version: 1,
            root: Hash32(codec::sha256(&root_bytes)),
            proposals_root,
            oracles_root,
            proposal_count: proposal_ids.len() as u64,
            oracle_count: oracles.len() as u64,
            timestamp: now_ms,
        }
    }

    fn enter_voting(&mut self, id: &ProposalId) {
        self.set_phase(id, GovernancePhase::Voting);
        self.emit(LifecycleEvent::VotingOpened { id: *id });
    }

    fn start_timelock(&mut self, id: &ProposalId, now_ms: u64) {
        let Some(entry) = self.proposals.get_mut(id) else {
            return;
        };
        let duration_s = entry
            .routing
            .as_ref()
            .map(|r| r.friction.timelock_duration_s)
            .unwrap_or(0);
        let expires_at = now_ms.saturating_add(duration_s.saturating_mul(1_000));
        entry.timelock_expiry = Some(expires_at);
        entry.phase = GovernancePhase::Timelock;
        self.emit(LifecycleEvent::TimelockStarted {
            id: *id,
            expires_at,
        });
    }

    fn reject(&mut self, id: &ProposalId, reason: String) {
        let Some(entry) = self.proposals.get_mut(id) else {
            return;
        };
        entry.phase = GovernancePhase::Rejected;
        entry.rejection_reason = Some(reason.clone());
        tracing::info!(proposal = %id, reason = %reason, "proposal rejected");
        self.emit(LifecycleEvent::Rejected { id: *id, reason });
    }

    fn set_phase(&mut self, id: &ProposalId, phase: GovernancePhase) {
        if let Some(entry) = self.proposals.get_mut(id) {
            entry.phase = phase;
        }
    }

    fn expect_phase(
        &mut self,
        id: &ProposalId,
        phase: GovernancePhase,
        operation: &str,
    ) -> Result<&mut GovernanceProposal, GovernanceError> {
        let entry = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::UnknownProposal(*id))?;
        if entry.phase != phase {
            return Err(GovernanceError::InvalidTransition {
                phase: entry.phase,
                operation: operation.to_string(),
            });
        }
        Ok(entry)
    }

    fn emit(&self, event: LifecycleEvent) {
        self.observer.on_event(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_api::events::NullObserver;
    use accord_types::app::Layer;

    fn orchestrator() -> GovernanceOrchestrator {
        GovernanceOrchestrator::new(
            VerificationParams::default(),
            RoutingParams::default(),
            Arc::new(NullObserver),
        )
    }

    fn proposal(text: &str) -> Proposal {
        Proposal {
            proposer: Address::new("rA"),
            logic_ast: r#"{"action":"transfer","amount":100}"#.to_string(),
            text: text.to_string(),
            layer: Layer::L2Operational,
            created_at: 0,
        }
    }

    #[test]
    fn submit_assigns_canonical_identity_and_phase() {
        let mut orch = orchestrator();
        let outcome = orch.submit(proposal("Fund the commons")).unwrap();
        let stored = orch.proposal(&outcome.id).unwrap();
        assert_eq!(stored.phase, GovernancePhase::Submitted);
        assert!(outcome.channel_a.pass);
        assert_eq!(outcome.memo.layer, "L2-Operational");

        orch.begin_oracle_review(outcome.id).unwrap();
        assert_eq!(
            orch.proposal(&outcome.id).unwrap().phase,
            GovernancePhase::OracleReview
        );
        // Review can only begin once.
        assert!(matches!(
            orch.begin_oracle_review(outcome.id),
            Err(GovernanceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn duplicate_submission_is_rejected() {
        let mut orch = orchestrator();
        orch.submit(proposal("Fund the commons")).unwrap();
        // Same canonical identity despite cosmetic differences.
        let err = orch.submit(proposal("  fund THE commons!! "));
        assert!(matches!(err, Err(GovernanceError::DuplicateProposal(_))));
    }

    #[test]
    fn out_of_phase_operations_do_not_corrupt_state() {
        let mut orch = orchestrator();
        let id = orch.submit(proposal("Fund the commons")).unwrap().id;

        let err = orch.on_voting_closed(
            id,
            VotingTally {
                yes: 1,
                no: 0,
                abstain: 0,
                participation_rate: 1.0,
                quorum_reached: true,
                passed: true,
            },
            0,
        );
        assert!(matches!(err, Err(GovernanceError::InvalidTransition { .. })));
        let stored = orch.proposal(&id).unwrap();
        assert_eq!(stored.phase, GovernancePhase::Submitted);
        assert!(stored.voting_tally.is_none());
    }

    #[test]
    fn ticker_is_idempotent() {
        let mut orch = orchestrator();
        let id = orch.submit(proposal("Fund the commons")).unwrap().id;
        // Force a timelock directly through the internal path.
        orch.proposals.get_mut(&id).unwrap().routing = Some(RoutingOutcome {
            route: Route::StandardVoting,
            friction: crate::routing::friction(
                0.9,
                Layer::L2Operational,
                accord_types::app::DecidabilityClass::II,
                &RoutingParams::default(),
            ),
            rejection_reason: None,
        });
        orch.proposals.get_mut(&id).unwrap().phase = GovernancePhase::Voting;
        orch.on_voting_closed(
            id,
            VotingTally {
                yes: 10,
                no: 1,
                abstain: 0,
                participation_rate: 0.5,
                quorum_reached: true,
                passed: true,
            },
            1_000,
        )
        .unwrap();

        let expiry = orch.proposal(&id).unwrap().timelock_expiry.unwrap();
        assert!(orch.check_phase_transitions(expiry - 1).is_empty());
        assert_eq!(orch.check_phase_transitions(expiry), vec![id]);
        // Second tick finds nothing left to expire.
        assert!(orch.check_phase_transitions(expiry + 1).is_empty());
        assert_eq!(
            orch.proposal(&id).unwrap().phase,
            GovernancePhase::ReadyToExecute
        );
    }

    #[test]
    fn execute_requires_ready_state() {
        let mut orch = orchestrator();
        let id = orch.submit(proposal("Fund the commons")).unwrap().id;
        assert!(matches!(
            orch.execute(id, "TX1".to_string()),
            Err(GovernanceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn state_anchor_is_order_independent() {
        let mut orch = orchestrator();
        orch.submit(proposal("one")).unwrap();
        orch.submit(proposal("two")).unwrap();
        let a = orch.state_anchor(&[Address::new("rB"), Address::new("rA")], 5);
        let b = orch.state_anchor(&[Address::new("rA"), Address::new("rB")], 5);
        assert_eq!(a, b);
        assert_eq!(a.proposal_count, 2);
        assert_eq!(a.oracle_count, 2);
        assert_eq!(a.version, 1);
    }
}
