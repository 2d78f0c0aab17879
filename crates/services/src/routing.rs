// Path: crates/services/src/routing.rs

//! The decidability router.
//!
//! Maps `(Channel A, Channel B, layer)` to a resolution route and the
//! friction applied wherever voting occurs. Everything here is a pure
//! function; the routing table is evaluated top to bottom and the first
//! matching row wins.

use accord_types::app::{
    ChannelAVerdict, ChannelBVerdict, DecidabilityClass, FrictionParams, Layer, Route,
    RoutingOutcome,
};
use accord_types::params::RoutingParams;

/// Selects the route for a proposal.
pub fn route(layer: Layer, channel_a: &ChannelAVerdict, channel_b: &ChannelBVerdict) -> Route {
    if layer == Layer::L0Immutable {
        return Route::Rejected;
    }
    if !channel_a.pass {
        return Route::Rejected;
    }
    if channel_b.ai_interest_conflict || channel_b.decidability_class == DecidabilityClass::IV {
        return Route::HumanMajorityJury;
    }
    match channel_b.decidability_class {
        DecidabilityClass::I => Route::FormalVerification,
        DecidabilityClass::III => Route::ConstitutionalJury,
        _ => Route::StandardVoting,
    }
}

/// Computes friction from the alignment score, then raises it to the
/// layer floor, then applies the Class IV overrides.
pub fn friction(
    alignment_score: f64,
    layer: Layer,
    class: DecidabilityClass,
    params: &RoutingParams,
) -> FrictionParams {
    let score = alignment_score.clamp(0.0, 1.0);
    let mut quorum_multiplier = 1.0 + (1.0 - score) * 0.5;
    let mut timelock_multiplier = 1.0 + (1.0 - score) * 2.0;

    if class == DecidabilityClass::IV {
        quorum_multiplier *= 1.5;
        timelock_multiplier *= 2.0;
    }

    let mut required_quorum = params.base_quorum * quorum_multiplier;
    let mut timelock_duration_s =
        (params.base_timelock_s as f64 * timelock_multiplier).floor() as u64;

    match layer {
        Layer::L1Constitutional => {
            required_quorum = required_quorum.max(0.67);
            timelock_duration_s = timelock_duration_s.max(30 * 86_400);
        }
        Layer::L3Execution => {
            required_quorum = required_quorum.max(0.05);
            timelock_duration_s = timelock_duration_s.max(12 * 3_600);
        }
        _ => {}
    }

    if class == DecidabilityClass::IV {
        required_quorum = required_quorum.max(0.5);
        timelock_duration_s = timelock_duration_s.max(7 * 86_400);
    }

    FrictionParams {
        required_quorum,
        timelock_duration_s,
        quorum_multiplier,
        timelock_multiplier,
        alignment_score: score,
    }
}

/// Routes a proposal and attaches friction, with the terminal reason when
/// the route is `Rejected`.
pub fn decide(
    layer: Layer,
    channel_a: &ChannelAVerdict,
    channel_b: &ChannelBVerdict,
    params: &RoutingParams,
) -> RoutingOutcome {
    let selected = route(layer, channel_a, channel_b);
    let effective_class = if channel_b.ai_interest_conflict {
        DecidabilityClass::IV
    } else {
        channel_b.decidability_class
    };
    let friction = friction(channel_b.alignment_score, layer, effective_class, params);

    let rejection_reason = match selected {
        Route::Rejected if layer == Layer::L0Immutable => {
            Some("Layer L0-Immutable cannot be modified".to_string())
        }
        Route::Rejected => Some(format!(
            "Channel A verification failed (complexity {}, paradox {}, cycle {})",
            channel_a.complexity_score, channel_a.paradox_found, channel_a.cycle_found
        )),
        _ => None,
    };

    RoutingOutcome {
        route: selected,
        friction,
        rejection_reason,
    }
}
