// Path: crates/types/src/app/events.rs

use crate::app::governance::{JuryVerdict, VoteChoice, VotingTally};
use crate::app::verdict::{AggregatedVerdict, Route};
use crate::app::{Address, ProposalId};
use serde::{Deserialize, Serialize};

/// A unified event type representing observable state changes in the
/// orchestrator. Events for a single proposal are strictly ordered; across
/// proposals they interleave arbitrarily. Delivery is through the
/// `EventObserver` interface; the kernel does not depend on any particular
/// transport.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum LifecycleEvent {
    /// A proposal was accepted and canonicalized.
    Submitted {
        /// The proposal's canonical identity.
        id: ProposalId,
    },

    /// The oracle commit–reveal round completed.
    ReviewComplete {
        /// The proposal under review.
        id: ProposalId,
        /// The aggregated consensus outcome.
        aggregated: AggregatedVerdict,
    },

    /// The router selected a resolution procedure.
    Routed {
        /// The routed proposal.
        id: ProposalId,
        /// The selected route.
        route: Route,
    },

    /// A token-weighted voting period opened.
    VotingOpened {
        /// The proposal being voted on.
        id: ProposalId,
    },

    /// A vote was accepted into an open period.
    VoteCast {
        /// The proposal being voted on.
        id: ProposalId,
        /// The casting account.
        voter: Address,
        /// The recorded choice.
        choice: VoteChoice,
        /// The effective power counted for the cast.
        power: u128,
    },

    /// A voting period closed.
    VotingClosed {
        /// The proposal that was voted on.
        id: ProposalId,
        /// The final tally.
        tally: VotingTally,
    },

    /// A jury panel was sampled.
    JurySelected {
        /// The proposal under jury review.
        id: ProposalId,
        /// The sampled panel.
        panel: Vec<Address>,
    },

    /// A jury reached (or failed to reach) a verdict.
    VerdictReached {
        /// The proposal under jury review.
        id: ProposalId,
        /// The resolution.
        verdict: JuryVerdict,
    },

    /// The proposal passed its resolution procedure.
    Passed {
        /// The passing proposal.
        id: ProposalId,
    },

    /// The proposal was terminally rejected.
    Rejected {
        /// The rejected proposal.
        id: ProposalId,
        /// The terminal reason.
        reason: String,
    },

    /// The timelock started.
    TimelockStarted {
        /// The proposal in timelock.
        id: ProposalId,
        /// Wall-clock expiry (ms).
        expires_at: u64,
    },

    /// The timelock expired; the proposal is executable.
    TimelockExpired {
        /// The executable proposal.
        id: ProposalId,
    },

    /// The proposal was executed on the substrate.
    Executed {
        /// The executed proposal.
        id: ProposalId,
        /// The substrate transaction hash.
        tx_hash: String,
    },
}
