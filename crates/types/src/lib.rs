// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Accord Kernel Types
//!
//! This crate is the foundational library for the Accord governance kernel,
//! containing all core data structures, error types, and parameter objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `accord-types` has minimal dependencies and is itself a
//! dependency for almost every other crate in the workspace. This structure
//! prevents circular dependencies and provides a stable, canonical definition
//! for shared types like `Proposal`, `OracleOperator`, the verdict records,
//! and the per-subsystem error enums.

/// The maximum size in bytes of a raw `logic_ast` accepted for verification.
pub const MAX_RAW_AST_BYTES: usize = 256 * 1024; // 256 KiB
/// The maximum size in bytes of a fraud-proof witness payload.
pub const MAX_WITNESS_BYTES: usize = 512 * 1024; // 512 KiB

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::GovernanceError> = std::result::Result<T, E>;

/// Core application-level data structures like `Proposal`, verdicts, and operators.
pub mod app;
/// The canonical JSON codec and hashing helpers for consensus-critical bytes.
pub mod codec;
/// A unified set of all error types used across the kernel.
pub mod error;
/// Parameter structures carrying the normative protocol constants.
pub mod params;
/// A prelude containing the most commonly used types.
pub mod prelude;
