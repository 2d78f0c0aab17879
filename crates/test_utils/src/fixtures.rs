// Path: crates/test_utils/src/fixtures.rs

//! Builders for the data the scenarios use over and over.

use accord_types::app::{
    Address, ChannelBVerdict, DecidabilityClass, Layer, Proposal,
};

/// A proposal with sensible defaults: L2, fixed timestamp, `rAlice` as
/// proposer.
pub fn proposal(logic_ast: &str, text: &str, layer: Layer) -> Proposal {
    Proposal {
        proposer: Address::new("rAlice"),
        logic_ast: logic_ast.to_string(),
        text: text.to_string(),
        layer,
        created_at: 1_700_000_000_000,
    }
}

/// A Channel B verdict with no conflict and no epistemic flag.
pub fn verdict_b(alignment_score: f64, decidability_class: DecidabilityClass) -> ChannelBVerdict {
    ChannelBVerdict {
        alignment_score,
        decidability_class,
        ai_interest_conflict: false,
        epistemic_flag: None,
    }
}
