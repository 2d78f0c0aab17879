// Path: crates/consensus/src/aggregate.rs

//! Aggregation of revealed verdicts.
//!
//! A pure function of the ordered reveal list: majority vote on Channel A
//! `pass` with ties towards `false`, the consensus record copied from the
//! first majority reveal in order, arithmetic-mean alignment score, and
//! plurality decidability class with ties resolved to the highest class.

use accord_types::app::{
    Address, AggregatedVerdict, ChannelAVerdict, DecidabilityClass, Reveal,
};
use std::collections::BTreeSet;

/// Aggregates `reveals` (already in ledger-index order) from `committers`.
///
/// With zero reveals the result is the most conservative one possible: a
/// failing Channel A record, zero alignment, and the highest decidability
/// class. Quorum cannot be reached in that case, so the orchestrator
/// rejects the proposal regardless.
pub fn aggregate_reveals(
    reveals: &[Reveal],
    committers: &[Address],
    quorum_required: u32,
) -> AggregatedVerdict {
    let participation = reveals.len() as u32;
    let quorum_reached = participation >= quorum_required;

    let revealers: BTreeSet<&Address> = reveals.iter().map(|r| &r.oracle).collect();
    let non_revealers: Vec<Address> = committers
        .iter()
        .filter(|c| !revealers.contains(c))
        .cloned()
        .collect();

    let channel_a = consensus_channel_a(reveals);
    let (alignment_score, decidability_class, ai_interest_conflict) = consensus_channel_b(reveals);

    AggregatedVerdict {
        participation,
        quorum_required,
        quorum_reached,
        channel_a,
        alignment_score,
        decidability_class,
        ai_interest_conflict,
        non_revealers,
    }
}

fn consensus_channel_a(reveals: &[Reveal]) -> ChannelAVerdict {
    if reveals.is_empty() {
        return ChannelAVerdict::malformed();
    }
    let passes = reveals.iter().filter(|r| r.verdict.channel_a.pass).count();
    let fails = reveals.len() - passes;
    // Tie-break towards failure.
    let majority_pass = passes > fails;

    reveals
        .iter()
        .map(|r| r.verdict.channel_a)
        .find(|a| a.pass == majority_pass)
        .unwrap_or(ChannelAVerdict::malformed())
}

fn consensus_channel_b(reveals: &[Reveal]) -> (f64, DecidabilityClass, bool) {
    if reveals.is_empty() {
        return (0.0, DecidabilityClass::IV, false);
    }

    let n = reveals.len() as f64;
    let mean_score = reveals
        .iter()
        .map(|r| r.verdict.channel_b.alignment_score)
        .sum::<f64>()
        / n;

    // Plurality class; ties resolve to the highest (most conservative).
    let mut counts: [usize; 4] = [0; 4];
    for r in reveals {
        let slot = match r.verdict.channel_b.decidability_class {
            DecidabilityClass::I => 0,
            DecidabilityClass::II => 1,
            DecidabilityClass::III => 2,
            DecidabilityClass::IV => 3,
        };
        if let Some(c) = counts.get_mut(slot) {
            *c += 1;
        }
    }
    let best = counts.iter().copied().max().unwrap_or(0);
    let class = if counts.get(3).copied().unwrap_or(0) == best {
        DecidabilityClass::IV
    } else if counts.get(2).copied().unwrap_or(0) == best {
        DecidabilityClass::III
    } else if counts.get(1).copied().unwrap_or(0) == best {
        DecidabilityClass::II
    } else {
        DecidabilityClass::I
    };

    // Majority on the recusal flag; ties resolve conservatively to true.
    let conflicts = reveals
        .iter()
        .filter(|r| r.verdict.channel_b.ai_interest_conflict)
        .count();
    let conflict = conflicts * 2 >= reveals.len();

    (mean_score, class, conflict)
}
