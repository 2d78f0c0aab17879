// Path: crates/types/src/app/verdict.rs

//! Verdict records for the two assessment channels, plus the routing and
//! friction outcomes derived from them.

use crate::app::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The deterministic Channel A verdict.
///
/// Invariant: `pass == (complexity_score <= max_complexity) && !paradox_found
/// && !cycle_found`. Any conforming implementation must compute the same
/// four fields from the same canonical bytes, or fraud proofs against it
/// become invalid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelAVerdict {
    /// The binary outcome of the verification pipeline.
    pub pass: bool,
    /// Deflate-compressed length of the canonical payload.
    pub complexity_score: u64,
    /// Whether a pinned self-reference pattern matched the normalized text.
    pub paradox_found: bool,
    /// Whether the AST dependency graph contains a cycle.
    pub cycle_found: bool,
}

impl ChannelAVerdict {
    /// The verdict emitted when canonicalization itself fails: all flags
    /// false, score zero, `pass` false.
    pub fn malformed() -> Self {
        Self {
            pass: false,
            complexity_score: 0,
            paradox_found: false,
            cycle_found: false,
        }
    }
}

/// The decidability class assigned by the semantic assessor.
///
/// Ordering is significant: ties in class plurality resolve to the highest
/// (most conservative) class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecidabilityClass {
    /// Formally verifiable logic; routed to external formal verification.
    I,
    /// Ordinary decidable policy; routed to standard voting.
    II,
    /// Contested or value-laden; routed to the constitutional jury.
    III,
    /// Beyond machine adjudication; routed to the human-majority jury.
    IV,
}

impl fmt::Display for DecidabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecidabilityClass::I => "I",
            DecidabilityClass::II => "II",
            DecidabilityClass::III => "III",
            DecidabilityClass::IV => "IV",
        };
        f.write_str(s)
    }
}

/// Epistemic qualifier attached by the assessor when its own output is
/// degraded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpistemicFlag {
    /// The assessor could not produce a confident verdict.
    #[serde(rename = "UNCERTAIN")]
    Uncertain,
}

/// The semantic Channel B verdict, consumed opaquely from the external
/// assessor. The kernel never recomputes any field of this record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChannelBVerdict {
    /// Alignment score in `[0, 1]`; higher is better aligned.
    pub alignment_score: f64,
    /// The routing class.
    pub decidability_class: DecidabilityClass,
    /// Whether the assessor declared an interest conflict and recused itself.
    pub ai_interest_conflict: bool,
    /// Present when the assessor's output is degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epistemic_flag: Option<EpistemicFlag>,
}

impl ChannelBVerdict {
    /// The conservative stand-in used when the assessor fails or times out:
    /// neutral score, jury-bound class, uncertainty flagged.
    pub fn conservative_fallback() -> Self {
        Self {
            alignment_score: 0.5,
            decidability_class: DecidabilityClass::III,
            ai_interest_conflict: false,
            epistemic_flag: Some(EpistemicFlag::Uncertain),
        }
    }
}

/// The full verdict an oracle commits to and later reveals: both channels,
/// as observed by that oracle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OracleVerdict {
    /// The oracle's independently computed Channel A verdict.
    pub channel_a: ChannelAVerdict,
    /// The oracle's observed Channel B verdict.
    pub channel_b: ChannelBVerdict,
}

/// The consensus output of a completed commit–reveal round.
///
/// A pure function of the ledger-index-ordered multiset of accepted
/// reveals; no wall-clock input.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregatedVerdict {
    /// Number of accepted reveals.
    pub participation: u32,
    /// `ceil(active_set_size * 2/3)` at round initialization.
    pub quorum_required: u32,
    /// Whether participation met the quorum.
    pub quorum_reached: bool,
    /// The consensus Channel A verdict, copied from the first majority
    /// reveal in ledger-index order. Ties on `pass` break towards `false`.
    pub channel_a: ChannelAVerdict,
    /// Arithmetic mean of the revealed alignment scores.
    pub alignment_score: f64,
    /// Plurality decidability class; ties resolve to the highest class.
    pub decidability_class: DecidabilityClass,
    /// Majority vote on the revealed conflict flags; ties resolve to `true`.
    pub ai_interest_conflict: bool,
    /// Oracles that committed but never revealed, marked for slashing.
    pub non_revealers: Vec<Address>,
}

/// Friction applied to whichever route a proposal takes, derived purely
/// from the alignment score: lower alignment, higher friction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FrictionParams {
    /// Participation rate required for the vote to count.
    pub required_quorum: f64,
    /// Delay between passage and executability, in seconds.
    pub timelock_duration_s: u64,
    /// The multiplier applied to the base quorum, range `[1.0, 1.5]`
    /// before class overrides.
    pub quorum_multiplier: f64,
    /// The multiplier applied to the base timelock, range `[1.0, 3.0]`
    /// before class overrides.
    pub timelock_multiplier: f64,
    /// The alignment score the friction was derived from.
    pub alignment_score: f64,
}

/// The resolution procedure selected for a proposal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Terminal rejection; no further procedure.
    Rejected,
    /// Token-weighted standard voting.
    StandardVoting,
    /// Constitutional jury review.
    ConstitutionalJury,
    /// Human-majority jury review (the assessor recused).
    HumanMajorityJury,
    /// External formal verification, then voting pass-through.
    FormalVerification,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Route::Rejected => "Rejected",
            Route::StandardVoting => "StandardVoting",
            Route::ConstitutionalJury => "ConstitutionalJury",
            Route::HumanMajorityJury => "HumanMajorityJury",
            Route::FormalVerification => "FormalVerification",
        };
        f.write_str(s)
    }
}

/// The router's full decision for a proposal: route, friction, and the
/// reason when the route is terminal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoutingOutcome {
    /// The selected route.
    pub route: Route,
    /// Friction applied wherever voting occurs on this route.
    pub friction: FrictionParams,
    /// The terminal reason, present only when `route` is `Rejected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ordering_is_conservative() {
        assert!(DecidabilityClass::I < DecidabilityClass::II);
        assert!(DecidabilityClass::III < DecidabilityClass::IV);
        assert_eq!(
            DecidabilityClass::III.max(DecidabilityClass::II),
            DecidabilityClass::III
        );
    }

    #[test]
    fn fallback_verdict_is_flagged_uncertain() {
        let v = ChannelBVerdict::conservative_fallback();
        assert_eq!(v.alignment_score, 0.5);
        assert_eq!(v.decidability_class, DecidabilityClass::III);
        assert!(!v.ai_interest_conflict);
        assert_eq!(v.epistemic_flag, Some(EpistemicFlag::Uncertain));
    }

    #[test]
    fn epistemic_flag_wire_tag() {
        let json = serde_json::to_string(&EpistemicFlag::Uncertain).unwrap();
        assert_eq!(json, "\"UNCERTAIN\"");
    }
}
