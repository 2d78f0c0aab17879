// Path: crates/types/src/app/governance.rs

//! The orchestrator's proposal envelope and the vocabulary of its phase
//! machine.
//!
//! The orchestrator is the sole writer of `GovernanceProposal` records;
//! every other component refers to proposals by id.

use crate::app::verdict::{AggregatedVerdict, ChannelAVerdict, ChannelBVerdict, RoutingOutcome};
use crate::app::{Address, Proposal, ProposalId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle phase of a proposal inside the orchestrator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernancePhase {
    /// Accepted and canonicalized; the oracle round is being opened.
    Submitted,
    /// The commit–reveal round is in flight.
    OracleReview,
    /// Review complete; awaiting the routing decision.
    Routing,
    /// A token-weighted voting period is open.
    Voting,
    /// Awaiting external formal verification.
    FormalVerification,
    /// A constitutional jury panel is deliberating.
    JuryReview,
    /// A human-majority jury panel is deliberating.
    HumanMajorityJury,
    /// Passed; waiting out the timelock.
    Timelock,
    /// Timelock expired; execution may proceed.
    ReadyToExecute,
    /// Executed on the substrate. Terminal.
    Executed,
    /// Rejected at some stage. Terminal; see `rejection_reason`.
    Rejected,
}

impl GovernancePhase {
    /// Whether the phase admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GovernancePhase::Executed | GovernancePhase::Rejected)
    }
}

impl fmt::Display for GovernancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GovernancePhase::Submitted => "Submitted",
            GovernancePhase::OracleReview => "OracleReview",
            GovernancePhase::Routing => "Routing",
            GovernancePhase::Voting => "Voting",
            GovernancePhase::FormalVerification => "FormalVerification",
            GovernancePhase::JuryReview => "JuryReview",
            GovernancePhase::HumanMajorityJury => "HumanMajorityJury",
            GovernancePhase::Timelock => "Timelock",
            GovernancePhase::ReadyToExecute => "ReadyToExecute",
            GovernancePhase::Executed => "Executed",
            GovernancePhase::Rejected => "Rejected",
        };
        f.write_str(s)
    }
}

/// A voter's choice in a voting period or jury deliberation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteChoice {
    /// In favor.
    Yes,
    /// Against.
    No,
    /// Present but not counted towards the yes/no comparison.
    Abstain,
}

impl VoteChoice {
    /// Returns the wire tag used in `VOTE` memos.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "Yes",
            VoteChoice::No => "No",
            VoteChoice::Abstain => "Abstain",
        }
    }
}

/// The closed tally of a voting period.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VotingTally {
    /// Power cast in favor.
    pub yes: u128,
    /// Power cast against.
    pub no: u128,
    /// Power cast as abstention; counts toward participation only.
    pub abstain: u128,
    /// `(yes + no + abstain) / total_supply`.
    pub participation_rate: f64,
    /// Whether participation met the friction-required quorum.
    pub quorum_reached: bool,
    /// `quorum_reached && yes > no`.
    pub passed: bool,
}

/// The jury's resolution of a proposal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JuryVerdict {
    /// A two-thirds supermajority voted yes.
    Approved,
    /// A two-thirds supermajority voted no.
    Rejected,
    /// Neither side reached the supermajority; the orchestrator treats this
    /// as rejection.
    NoVerdict,
}

/// The panel and outcome of a jury deliberation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JuryOutcome {
    /// The sampled panel, in selection order.
    pub panel: Vec<Address>,
    /// The verdict, once reached or timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<JuryVerdict>,
}

/// The orchestrator's envelope around a proposal: the immutable input plus
/// everything the pipeline has produced for it so far.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GovernanceProposal {
    /// The canonical identity of the proposal.
    pub id: ProposalId,
    /// The immutable input.
    pub proposal: Proposal,
    /// Current lifecycle phase.
    pub phase: GovernancePhase,
    /// The local Channel A verdict computed at submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_a: Option<ChannelAVerdict>,
    /// The aggregated oracle consensus, once the round completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregated: Option<AggregatedVerdict>,
    /// The external assessor's verdict, once obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_b: Option<ChannelBVerdict>,
    /// The router's decision, once routed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingOutcome>,
    /// The closed voting tally, if a voting period ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_tally: Option<VotingTally>,
    /// The jury panel and verdict, if a jury was convened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jury: Option<JuryOutcome>,
    /// Wall-clock expiry of the timelock (ms), once started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timelock_expiry: Option<u64>,
    /// The substrate transaction hash of the execution, once executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_tx: Option<String>,
    /// The terminal reason, present exactly when `phase` is `Rejected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
