// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]

//! # Accord Kernel Services
//!
//! The stateful subsystems of the governance kernel. Each subsystem is an
//! owned, addressable component the host serializes behind its own lock;
//! cross-component calls pass ids and values, never shared mutable
//! handles. The orchestrator sequences a proposal across the others but
//! owns only its own `GovernanceProposal` records.

/// The governance orchestrator: lifecycle state machine and event emission.
pub mod governance;
/// VRF-weighted jury sampling and supermajority resolution.
pub mod jury;
/// Active-set selection, epoch rotation, and operator metrics.
pub mod registry;
/// The decidability router: (Channel A, Channel B, layer) to route + friction.
pub mod routing;
/// Bond accounting, slash events, and epoch reward distribution.
pub mod staking;
/// Token-weighted voting with additive, directional delegation.
pub mod voting;

pub use governance::GovernanceOrchestrator;
pub use jury::{EligibleAccount, JurySystem};
pub use registry::OracleRegistry;
pub use routing::{decide, friction, route};
pub use staking::SlashingLedger;
pub use voting::VotingSystem;
