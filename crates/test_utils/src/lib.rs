// Path: crates/test_utils/src/lib.rs

//! # Accord Test Utilities
//!
//! Shared fixtures and mock collaborators for kernel tests: an in-memory
//! ledger substrate, a scripted semantic assessor, an event-capturing
//! observer, and proposal builders. Test-only code; never a dependency of
//! a production crate.

/// Proposal and verdict builders.
pub mod fixtures;
/// Mock implementations of the `accord-api` traits.
pub mod mocks;

pub use fixtures::{proposal, verdict_b};
pub use mocks::{CapturingObserver, MockAssessor, MockSubstrate};
