// Path: crates/telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Accord Kernel Telemetry
//!
//! Observability infrastructure for kernel hosts: structured JSON logging
//! initialization and a small RAII scope timer. The kernel crates log
//! through `tracing` and the `log` facade; hosts call [`init::init_tracing`]
//! once at startup to wire both into one subscriber.

/// The initialization routine for global structured logging.
pub mod init;
/// A simple RAII timer for measuring the duration of a scope.
pub mod time;

pub use init::init_tracing;
pub use time::ScopeTimer;
