// Path: crates/api/src/lib.rs

//! # Accord Kernel API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
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
//! # Accord Kernel API
//!
//! Core traits for the Accord governance kernel's external collaborators.
//! The kernel itself performs no I/O: hosts implement these traits over
//! their transport of choice and invoke kernel operations with
//! already-materialized inputs.

/// The semantic-alignment assessor boundary (Channel B).
pub mod assessor;
/// The observer interface for orchestrator lifecycle events.
pub mod events;
/// The ledger substrate boundary: memos, escrows, ledger clocks.
pub mod substrate;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::assessor::SemanticAssessor;
    pub use crate::events::{EventObserver, NullObserver};
    pub use crate::substrate::{LedgerSubstrate, MemoReceipt};
}
