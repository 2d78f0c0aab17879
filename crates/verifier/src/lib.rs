// Path: crates/verifier/src/lib.rs
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

//! # Accord Verification Engine
//!
//! The deterministic Channel A pipeline: canonicalization, complexity
//! bound, paradox detection, and cycle detection. Everything in this crate
//! is a pure function of its inputs — same bytes in, same verdict out, on
//! any conforming implementation — because fraud proofs re-execute this
//! exact pipeline and compare field-for-field.
//!
//! Determinism pins: deflate is RFC 1951 at level 9 with the default
//! 32 KiB window and no preset dictionary; the paradox patterns run under
//! the non-backtracking `regex` engine; cycle detection is Tarjan's SCC
//! over a flat path arena.

/// Canonical payload construction (§ "Canonicalizer").
pub mod canonical;
/// Deflate-based complexity scoring.
pub mod complexity;
/// AST dependency-graph cycle detection.
pub mod cycle;
/// The verification pipeline itself.
pub mod engine;
/// Fraud-proof re-execution and comparison.
pub mod fraud;
/// The pinned self-reference pattern set.
pub mod paradox;

pub use canonical::canonicalize;
pub use engine::{execute, verify};
pub use fraud::{verify_fraud_proof, Discrepancy, FraudProof, FraudVerdict, FraudWitness};
