// Path: crates/api/src/events.rs

//! The observer interface for orchestrator lifecycle events.
//!
//! The orchestrator emits a `LifecycleEvent` on every phase transition.
//! Observers must be cheap and non-blocking; anything slow belongs behind
//! a channel in the host.

use accord_types::app::LifecycleEvent;

/// A sink for orchestrator lifecycle events.
pub trait EventObserver: Send + Sync {
    /// Called synchronously on every transition, in per-proposal order.
    fn on_event(&self, event: &LifecycleEvent);
}

/// An observer that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EventObserver for NullObserver {
    fn on_event(&self, _event: &LifecycleEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_types::app::ProposalId;

    #[test]
    fn null_observer_accepts_events() {
        let obs = NullObserver;
        obs.on_event(&LifecycleEvent::Submitted {
            id: ProposalId([9; 32]),
        });
    }
}
