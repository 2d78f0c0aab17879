// Path: crates/types/src/app/penalties.rs

//! Defines the canonical, fact-based records for penalizing oracle
//! misbehavior.
//!
//! Slash events are append-only facts: once `executed` is set the record is
//! never mutated, and the staking ledger's conservation audit sums over the
//! full history. Channel-B disagreement is never an offense; only failure
//! to reveal, sustained inactivity, and proven Channel-A fraud are.

use crate::app::{Address, ProposalId};
use serde::{Deserialize, Serialize};

/// Classifies the offense behind a slash.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlashType {
    /// The oracle committed but failed to reveal before the deadline.
    NonReveal,
    /// A fraud proof demonstrated the oracle's Channel A verdict diverges
    /// from the deterministic re-execution.
    Fraud,
    /// The oracle accumulated too many missed reveals within an epoch.
    Inactivity,
}

/// One executed or pending slash against an operator's bond.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SlashEvent {
    /// Ledger-local sequence number, unique per event.
    pub id: u64,
    /// The penalized operator.
    pub oracle: Address,
    /// The offense class.
    pub slash_type: SlashType,
    /// The amount removed from the bond, in drops.
    pub amount_drops: u128,
    /// The proposal the offense occurred in, when attributable to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<ProposalId>,
    /// Wall-clock time the slash was applied (ms).
    pub timestamp: u64,
    /// Whether the bond decrement has been carried out.
    pub executed: bool,
}
